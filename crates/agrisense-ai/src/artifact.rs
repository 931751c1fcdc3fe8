//! Serde JSON model artifacts and their load-time validation.
//!
//! Artifacts are small committed files: class labels plus one centroid per
//! class, with a per-feature scaler for the tabular models. Validation is
//! strict because a malformed model must stop the process at startup, not
//! produce silent nonsense at request time.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact not found: {0}")]
    NotFound(PathBuf),

    #[error("read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid artifact {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

/// Per-feature standardization parameters fitted at training time.
#[derive(Debug, Clone, Deserialize)]
pub struct Scaler {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
}

/// A tabular recommender: named features, scaler, and one centroid per
/// class in original measurement units.
#[derive(Debug, Clone, Deserialize)]
pub struct TabularArtifact {
    pub name: String,
    pub version: String,
    pub features: Vec<String>,
    pub scaler: Scaler,
    pub classes: Vec<String>,
    pub centroids: Vec<Vec<f64>>,
}

impl TabularArtifact {
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let artifact: Self = parse(path)?;
        artifact.validate().map_err(|reason| ArtifactError::Invalid {
            path: path.to_path_buf(),
            reason,
        })?;
        Ok(artifact)
    }

    fn validate(&self) -> Result<(), String> {
        if self.features.is_empty() {
            return Err("no features".to_string());
        }
        if self.scaler.mean.len() != self.features.len()
            || self.scaler.std.len() != self.features.len()
        {
            return Err(format!(
                "scaler has {}/{} entries for {} features",
                self.scaler.mean.len(),
                self.scaler.std.len(),
                self.features.len()
            ));
        }
        if let Some(i) = self.scaler.std.iter().position(|s| *s <= 0.0) {
            return Err(format!(
                "scaler std for feature '{}' is not positive",
                self.features[i]
            ));
        }
        validate_classes(&self.classes)?;
        if self.centroids.len() != self.classes.len() {
            return Err(format!(
                "{} centroids for {} classes",
                self.centroids.len(),
                self.classes.len()
            ));
        }
        for (i, centroid) in self.centroids.iter().enumerate() {
            if centroid.len() != self.features.len() {
                return Err(format!(
                    "centroid for class '{}' has {} values, expected {}",
                    self.classes[i],
                    centroid.len(),
                    self.features.len()
                ));
            }
        }
        Ok(())
    }
}

/// A leaf-disease classifier for one crop: class labels and one centroid
/// per class in the leaf-statistics feature space.
#[derive(Debug, Clone, Deserialize)]
pub struct LeafArtifact {
    pub crop: String,
    pub version: String,
    pub classes: Vec<String>,
    pub centroids: Vec<Vec<f32>>,
}

impl LeafArtifact {
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let artifact: Self = parse(path)?;
        artifact.validate().map_err(|reason| ArtifactError::Invalid {
            path: path.to_path_buf(),
            reason,
        })?;
        Ok(artifact)
    }

    fn validate(&self) -> Result<(), String> {
        if self.crop.trim().is_empty() {
            return Err("empty crop name".to_string());
        }
        validate_classes(&self.classes)?;
        if self.centroids.len() != self.classes.len() {
            return Err(format!(
                "{} centroids for {} classes",
                self.centroids.len(),
                self.classes.len()
            ));
        }
        let dim = self.centroids.first().map(|c| c.len()).unwrap_or(0);
        if dim == 0 {
            return Err("empty centroid".to_string());
        }
        for (i, centroid) in self.centroids.iter().enumerate() {
            if centroid.len() != dim {
                return Err(format!(
                    "centroid for class '{}' has {} values, expected {dim}",
                    self.classes[i],
                    centroid.len()
                ));
            }
        }
        Ok(())
    }
}

fn validate_classes(classes: &[String]) -> Result<(), String> {
    if classes.is_empty() {
        return Err("no classes".to_string());
    }
    let distinct: HashSet<&str> = classes.iter().map(|c| c.as_str()).collect();
    if distinct.len() != classes.len() {
        return Err("duplicate class labels".to_string());
    }
    Ok(())
}

fn parse<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ArtifactError> {
    if !path.exists() {
        return Err(ArtifactError::NotFound(path.to_path_buf()));
    }
    let text = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
