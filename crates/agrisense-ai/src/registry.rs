//! Read-only model registry, loaded once at process start.
//!
//! Load is all-or-nothing: a missing or corrupt artifact, a class table
//! that disagrees with the mapper, or a stray artifact for an unrecognized
//! crop refuses construction so the process never serves traffic with a
//! broken model set. After load the registry is immutable and all
//! predictors are safe for unsynchronized concurrent inference.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use agrisense_core::{Crop, validate};

use crate::artifact::ArtifactError;
use crate::labels;
use crate::leaf::LeafModel;
use crate::tabular::TabularModel;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    #[error("{model} artifact disagrees with the mapping table: {detail}")]
    TableMismatch { model: &'static str, detail: String },

    #[error("disease artifact {path} is for unrecognized crop '{crop}'")]
    UnrecognizedArtifactCrop { path: PathBuf, crop: String },

    #[error("no disease model registered for crop '{}'", .0.as_str())]
    UnknownCrop(Crop),

    #[error("read models directory {path}: {source}")]
    Dir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The process-lifetime model set: one crop recommender, one fertilizer
/// recommender, and one leaf classifier per supported crop.
#[derive(Debug)]
pub struct ModelRegistry {
    crop: TabularModel,
    fertilizer: TabularModel,
    disease: HashMap<Crop, LeafModel>,
}

impl ModelRegistry {
    /// Load every artifact under `dir`: `crop.json`, `fertilizer.json`,
    /// and `disease/<crop>.json` for each supported crop.
    pub fn load(dir: &Path) -> Result<Self, RegistryError> {
        let crop = TabularModel::load(&dir.join("crop.json"))?;
        check_tabular(&crop, "crop", validate::CROP_FIELDS.len(), labels::CROP_CLASSES)?;

        let fertilizer = TabularModel::load(&dir.join("fertilizer.json"))?;
        let fertilizer_names: Vec<&str> = labels::FERTILIZERS.iter().map(|f| f.name).collect();
        check_tabular(
            &fertilizer,
            "fertilizer",
            validate::FERTILIZER_FIELDS.len() - 2,
            &fertilizer_names,
        )?;

        let disease_dir = dir.join("disease");
        let mut disease = HashMap::new();
        for &kind in Crop::ALL {
            let path = disease_dir.join(format!("{}.json", kind.as_str()));
            let model = LeafModel::load(&path, kind)?;
            check_leaf(&model, kind)?;
            disease.insert(kind, model);
        }

        // A stray artifact for a crop outside the catalog is a deployment
        // fault worth stopping on.
        let entries = fs::read_dir(&disease_dir).map_err(|source| RegistryError::Dir {
            path: disease_dir.clone(),
            source,
        })?;
        for entry in entries {
            let entry = entry.map_err(|source| RegistryError::Dir {
                path: disease_dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|e| e == "json")
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
                && Crop::parse(stem).is_none()
            {
                return Err(RegistryError::UnrecognizedArtifactCrop {
                    crop: stem.to_string(),
                    path,
                });
            }
        }

        info!(disease_models = disease.len(), "model registry ready");
        Ok(Self {
            crop,
            fertilizer,
            disease,
        })
    }

    /// Assemble a registry from already-built models. Callers normally use
    /// [`load`](Self::load); this exists for composition in tests.
    pub fn from_models(
        crop: TabularModel,
        fertilizer: TabularModel,
        disease: HashMap<Crop, LeafModel>,
    ) -> Self {
        Self {
            crop,
            fertilizer,
            disease,
        }
    }

    pub fn crop_model(&self) -> &TabularModel {
        &self.crop
    }

    pub fn fertilizer_model(&self) -> &TabularModel {
        &self.fertilizer
    }

    /// The leaf classifier for a crop. Failure here means a supported crop
    /// has no registered model, which is an internal fault, not user error.
    pub fn disease_model(&self, crop: Crop) -> Result<&LeafModel, RegistryError> {
        self.disease.get(&crop).ok_or(RegistryError::UnknownCrop(crop))
    }

    /// Artifact name/version pairs for startup logging, in a stable order.
    pub fn versions(&self) -> Vec<(String, String)> {
        let mut out = vec![
            (self.crop.name().to_string(), self.crop.version().to_string()),
            (
                self.fertilizer.name().to_string(),
                self.fertilizer.version().to_string(),
            ),
        ];
        for crop in Crop::ALL {
            if let Some(model) = self.disease.get(crop) {
                out.push((
                    format!("disease/{}", crop.as_str()),
                    model.version().to_string(),
                ));
            }
        }
        out
    }
}

// ── Load-time consistency checks ──

fn check_tabular(
    model: &TabularModel,
    name: &'static str,
    want_features: usize,
    want_classes: &[&str],
) -> Result<(), RegistryError> {
    if model.feature_count() != want_features {
        return Err(RegistryError::TableMismatch {
            model: name,
            detail: format!(
                "artifact has {} features, requests supply {want_features}",
                model.feature_count()
            ),
        });
    }
    check_classes(name, model.classes(), want_classes)
}

fn check_leaf(model: &LeafModel, crop: Crop) -> Result<(), RegistryError> {
    check_classes("disease", model.classes(), labels::disease_classes(crop))
}

fn check_classes(
    name: &'static str,
    got: &[String],
    want: &[&str],
) -> Result<(), RegistryError> {
    if got.len() != want.len() {
        return Err(RegistryError::TableMismatch {
            model: name,
            detail: format!("artifact has {} classes, table has {}", got.len(), want.len()),
        });
    }
    for (i, (g, w)) in got.iter().zip(want).enumerate() {
        if g != w {
            return Err(RegistryError::TableMismatch {
                model: name,
                detail: format!("class {i} is '{g}', table has '{w}'"),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn models_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("models")
    }

    fn copy_models(dst: &Path) {
        fs::create_dir_all(dst.join("disease")).unwrap();
        for name in ["crop.json", "fertilizer.json"] {
            fs::copy(models_dir().join(name), dst.join(name)).unwrap();
        }
        for crop in Crop::ALL {
            let name = format!("{}.json", crop.as_str());
            fs::copy(
                models_dir().join("disease").join(&name),
                dst.join("disease").join(&name),
            )
            .unwrap();
        }
    }

    fn edit_json(path: &Path, edit: impl FnOnce(&mut serde_json::Value)) {
        let mut value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        edit(&mut value);
        fs::write(path, serde_json::to_string(&value).unwrap()).unwrap();
    }

    #[test]
    fn loads_committed_artifacts() {
        let registry = ModelRegistry::load(&models_dir()).unwrap();
        assert_eq!(registry.crop_model().feature_count(), 7);
        assert_eq!(registry.fertilizer_model().feature_count(), 6);
        assert_eq!(registry.versions().len(), 11);
        for crop in Crop::ALL {
            assert!(registry.disease_model(*crop).is_ok(), "{}", crop.as_str());
        }
    }

    #[test]
    fn committed_artifacts_agree_with_mapping_tables() {
        let registry = ModelRegistry::load(&models_dir()).unwrap();
        for (i, label) in labels::CROP_CLASSES.iter().enumerate() {
            assert_eq!(registry.crop_model().class_label(i), Some(*label));
        }
        for (i, f) in labels::FERTILIZERS.iter().enumerate() {
            assert_eq!(registry.fertilizer_model().class_label(i), Some(f.name));
        }
        for crop in Crop::ALL {
            let model = registry.disease_model(*crop).unwrap();
            for (i, label) in labels::disease_classes(*crop).iter().enumerate() {
                assert_eq!(model.class_label(i), Some(*label), "{}", crop.as_str());
            }
        }
    }

    #[test]
    fn known_rice_profile_maps_to_rice() {
        let registry = ModelRegistry::load(&models_dir()).unwrap();
        let (idx, conf) = registry
            .crop_model()
            .infer(&[90.0, 42.0, 43.0, 20.8, 82.0, 6.5, 202.9]);
        assert_eq!(labels::crop_class(idx).unwrap(), "rice");
        assert!(conf > 0.0 && conf <= 1.0);
    }

    #[test]
    fn missing_artifact_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        copy_models(dir.path());
        fs::remove_file(dir.path().join("fertilizer.json")).unwrap();
        let err = ModelRegistry::load(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Artifact(ArtifactError::NotFound(_))
        ));
    }

    #[test]
    fn corrupt_artifact_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        copy_models(dir.path());
        fs::write(dir.path().join("crop.json"), "{ not json").unwrap();
        let err = ModelRegistry::load(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Artifact(ArtifactError::Parse { .. })
        ));
    }

    #[test]
    fn zero_scale_artifact_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        copy_models(dir.path());
        edit_json(&dir.path().join("crop.json"), |v| {
            v["scaler"]["std"][0] = serde_json::json!(0.0);
        });
        let err = ModelRegistry::load(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Artifact(ArtifactError::Invalid { .. })
        ));
    }

    #[test]
    fn class_drift_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        copy_models(dir.path());
        edit_json(&dir.path().join("crop.json"), |v| {
            v["classes"][0] = serde_json::json!("quinoa");
        });
        let err = ModelRegistry::load(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::TableMismatch { model: "crop", .. }
        ));
    }

    #[test]
    fn stray_disease_artifact_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        copy_models(dir.path());
        fs::copy(
            models_dir().join("disease").join("tomato.json"),
            dir.path().join("disease").join("banana.json"),
        )
        .unwrap();
        let err = ModelRegistry::load(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::UnrecognizedArtifactCrop { crop, .. } if crop == "banana"
        ));
    }

    #[test]
    fn disease_artifact_for_wrong_crop_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        copy_models(dir.path());
        fs::copy(
            models_dir().join("disease").join("tomato.json"),
            dir.path().join("disease").join("apple.json"),
        )
        .unwrap();
        let err = ModelRegistry::load(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Artifact(ArtifactError::Invalid { .. })
        ));
    }

    #[test]
    fn lookup_without_registered_model_fails() {
        let crop = TabularModel::load(&models_dir().join("crop.json")).unwrap();
        let fertilizer = TabularModel::load(&models_dir().join("fertilizer.json")).unwrap();
        let registry = ModelRegistry::from_models(crop, fertilizer, HashMap::new());
        let err = registry.disease_model(Crop::Tomato).unwrap_err();
        assert!(matches!(err, RegistryError::UnknownCrop(Crop::Tomato)));
    }
}
