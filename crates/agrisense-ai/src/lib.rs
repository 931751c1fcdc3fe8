//! Inference layer: committed JSON artifacts, centroid predictors for
//! tabular measurements and leaf photos, and the read-only model registry.

pub mod artifact;
pub mod labels;
pub mod leaf;
pub mod registry;
pub mod tabular;

pub use artifact::{ArtifactError, LeafArtifact, Scaler, TabularArtifact};
pub use labels::MappingError;
pub use leaf::LeafModel;
pub use registry::{ModelRegistry, RegistryError};
pub use tabular::TabularModel;
