pub mod catalog;
pub mod error;
pub mod features;
pub mod result;
pub mod upload;
pub mod validate;

pub use catalog::{Crop, FertilizerCrop, SoilType};
pub use error::ValidationError;
pub use features::{CropFeatures, FertilizerFeatures};
pub use result::{CropRecommendation, DiseaseFinding, FertilizerRecommendation, PredictionResult};
pub use upload::{ALLOWED_EXTENSIONS, ImageAsset, ImageUpload};
