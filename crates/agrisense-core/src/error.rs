use thiserror::Error;

/// Rejected user input. Every variant is fixable by the caller and safe to
/// surface verbatim.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("field '{field}' is not a valid number")]
    FieldConversion { field: String },

    #[error("no image file was provided")]
    MissingFile,

    #[error("image filename is empty")]
    EmptyFilename,

    #[error("extension '{extension}' is not an allowed image type (png, jpg, jpeg, gif, bmp)")]
    DisallowedExtension { extension: String },

    #[error("image could not be decoded: {0}")]
    UndecodableImage(String),

    #[error("field '{field}' has no category with code {index}")]
    UnknownCategory { field: String, index: usize },

    #[error("unknown crop '{0}'")]
    UnknownCrop(String),
}
