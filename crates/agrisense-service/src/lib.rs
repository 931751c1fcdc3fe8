//! Prediction flows over validated inputs and the loaded model registry.

pub mod error;
pub mod predict;

pub use error::PredictError;
pub use predict::PredictionService;
