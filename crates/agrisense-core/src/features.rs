//! Typed measurement structs for the two tabular predictors.

use serde::{Deserialize, Serialize};

use crate::catalog::{FertilizerCrop, SoilType};

/// The seven soil/climate measurements behind a crop recommendation.
///
/// Field order matches the feature order of the crop model artifact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropFeatures {
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub ph: f64,
    pub rainfall: f64,
}

impl CropFeatures {
    /// Feature vector in model order.
    pub fn as_vector(&self) -> [f64; 7] {
        [
            self.nitrogen,
            self.phosphorus,
            self.potassium,
            self.temperature,
            self.humidity,
            self.ph,
            self.rainfall,
        ]
    }
}

/// The six measurements plus two categorical codes behind a fertilizer
/// recommendation.
///
/// Numeric field order matches the feature order of the fertilizer model
/// artifact; the categoricals ride alongside and never enter the
/// numeric feature vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FertilizerFeatures {
    pub temperature: f64,
    pub humidity: f64,
    pub moisture: f64,
    pub nitrogen: f64,
    pub potassium: f64,
    pub phosphorus: f64,
    pub soil: SoilType,
    pub crop: FertilizerCrop,
}

impl FertilizerFeatures {
    /// Numeric feature vector in model order (categoricals excluded).
    pub fn numeric_vector(&self) -> [f64; 6] {
        [
            self.temperature,
            self.humidity,
            self.moisture,
            self.nitrogen,
            self.potassium,
            self.phosphorus,
        ]
    }
}
