use thiserror::Error;

use agrisense_ai::{MappingError, RegistryError};
use agrisense_core::ValidationError;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("mapping error: {0}")]
    Mapping(#[from] MappingError),
}

impl PredictError {
    /// Text safe to show the requester. Validation problems are theirs to
    /// fix and reported verbatim; registry and mapping faults are internal
    /// and deliberately vague.
    pub fn user_message(&self) -> String {
        match self {
            PredictError::Validation(e) => e.to_string(),
            PredictError::Registry(_) | PredictError::Mapping(_) => {
                "prediction is temporarily unavailable, try again later".to_string()
            }
        }
    }

    /// Internal faults deserve an operator-facing log line; validation
    /// failures do not.
    pub fn is_internal(&self) -> bool {
        !matches!(self, PredictError::Validation(_))
    }
}
