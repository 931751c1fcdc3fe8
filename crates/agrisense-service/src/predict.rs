//! The three prediction flows. Each one validates, infers, and maps, in
//! that order; inference never sees an unvalidated value.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use agrisense_ai::{ModelRegistry, labels};
use agrisense_core::result::{
    CropRecommendation, DiseaseFinding, FertilizerRecommendation, PredictionResult,
};
use agrisense_core::{ImageUpload, validate};

use crate::error::PredictError;

/// Stateless facade over the registry. Cheap to clone and safe to share;
/// every call is a pure function of its inputs and the loaded models.
#[derive(Clone)]
pub struct PredictionService {
    registry: Arc<ModelRegistry>,
}

impl PredictionService {
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self { registry }
    }

    /// Recommend a crop from seven soil and climate measurements.
    pub fn recommend_crop(
        &self,
        fields: &HashMap<String, String>,
    ) -> Result<PredictionResult, PredictError> {
        let features = validate::crop_features(fields)?;
        let (index, confidence) = self.registry.crop_model().infer(&features.as_vector());
        let name = labels::crop_class(index)?;

        info!(crop = name, confidence, "crop recommendation");
        Ok(PredictionResult::Crop(CropRecommendation {
            name: name.to_string(),
            confidence,
        }))
    }

    /// Recommend a fertilizer product from six measurements plus soil and
    /// crop category codes. The codes contextualize the result; only the
    /// measurements feed the model.
    pub fn recommend_fertilizer(
        &self,
        fields: &HashMap<String, String>,
    ) -> Result<PredictionResult, PredictError> {
        let features = validate::fertilizer_features(fields)?;
        let (index, confidence) = self
            .registry
            .fertilizer_model()
            .infer(&features.numeric_vector());
        let fertilizer = labels::fertilizer_class(index)?;

        info!(fertilizer = fertilizer.name, confidence, "fertilizer recommendation");
        Ok(PredictionResult::Fertilizer(FertilizerRecommendation {
            name: fertilizer.name.to_string(),
            guidance: fertilizer.guidance.to_string(),
            soil: features.soil,
            crop: features.crop,
            confidence,
        }))
    }

    /// Classify a leaf photo against the detector for the named crop.
    pub fn detect_disease(
        &self,
        crop: &str,
        upload: Option<&ImageUpload>,
    ) -> Result<PredictionResult, PredictError> {
        let crop = validate::crop_identifier(crop)?;
        let asset = validate::image(upload)?;

        let model = self.registry.disease_model(crop)?;
        let (index, confidence) = model.infer(asset.image());
        let disease = labels::disease_class(crop, index)?;

        info!(
            crop = crop.as_str(),
            disease,
            confidence,
            filename = asset.filename(),
            "disease finding"
        );
        Ok(PredictionResult::Disease(DiseaseFinding {
            crop,
            disease: disease.to_string(),
            confidence,
        }))
    }
}
