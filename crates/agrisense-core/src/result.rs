//! Prediction results: one tagged union across the three flows.

use serde::{Deserialize, Serialize};

use crate::catalog::{Crop, FertilizerCrop, SoilType};

/// Outcome of a prediction flow. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PredictionResult {
    Crop(CropRecommendation),
    Fertilizer(FertilizerRecommendation),
    Disease(DiseaseFinding),
}

/// Which crop to plant for the measured soil and climate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropRecommendation {
    pub name: String,
    /// Winning-class probability. Display data only.
    pub confidence: f32,
}

/// Which fertilizer product to apply, with its dosage guidance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FertilizerRecommendation {
    pub name: String,
    pub guidance: String,
    /// Categorical context echoed from the request for rendering.
    pub soil: SoilType,
    pub crop: FertilizerCrop,
    pub confidence: f32,
}

/// What the leaf classifier saw in an uploaded photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseFinding {
    pub crop: Crop,
    pub disease: String,
    pub confidence: f32,
}

impl DiseaseFinding {
    /// Every per-crop class table includes a healthy class.
    pub fn is_healthy(&self) -> bool {
        self.disease == "Healthy"
    }
}
