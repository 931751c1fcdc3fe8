//! Leaf-photo disease classifier.
//!
//! A photo is resized to a fixed square, summarized into colour and lesion
//! statistics, and matched to the nearest class centroid. One model per
//! crop; the class tables include a healthy class.

use std::path::Path;

use image::DynamicImage;
use image::imageops::FilterType;
use tracing::info;

use agrisense_core::Crop;

use crate::artifact::{ArtifactError, LeafArtifact};

/// Dimensionality of the leaf-statistics feature space:
/// RGB means, RGB standard deviations, green fraction, lesion fraction.
pub const LEAF_DIM: usize = 8;

/// Square edge photos are resampled to before statistics are computed.
pub const LEAF_SIZE: u32 = 64;

/// A per-crop leaf classifier built from a [`LeafArtifact`].
#[derive(Debug)]
pub struct LeafModel {
    crop: Crop,
    version: String,
    classes: Vec<String>,
    centroids: Vec<Vec<f32>>,
}

impl LeafModel {
    /// Load and validate an artifact, checking its feature space matches
    /// the extractor in this module.
    pub fn load(path: &Path, crop: Crop) -> Result<Self, ArtifactError> {
        let artifact = LeafArtifact::load(path)?;
        if artifact.crop != crop.as_str() {
            return Err(ArtifactError::Invalid {
                path: path.to_path_buf(),
                reason: format!(
                    "artifact is for crop '{}', expected '{}'",
                    artifact.crop,
                    crop.as_str()
                ),
            });
        }
        if artifact.centroids[0].len() != LEAF_DIM {
            return Err(ArtifactError::Invalid {
                path: path.to_path_buf(),
                reason: format!(
                    "centroids have {} values, leaf statistics have {LEAF_DIM}",
                    artifact.centroids[0].len()
                ),
            });
        }
        info!(
            crop = crop.as_str(),
            version = %artifact.version,
            classes = artifact.classes.len(),
            "loaded leaf model"
        );
        Ok(Self {
            crop,
            version: artifact.version,
            classes: artifact.classes,
            centroids: artifact.centroids,
        })
    }

    /// Classify a decoded leaf photo.
    ///
    /// Returns the winning class index and its softmax confidence.
    pub fn infer(&self, image: &DynamicImage) -> (usize, f32) {
        let features = leaf_features(image);
        let dists: Vec<f32> = self
            .centroids
            .iter()
            .map(|c| sq_dist(&features, c))
            .collect();
        let best = argmin(&dists);
        (best, softmax_confidence(&dists, best))
    }

    pub fn crop(&self) -> Crop {
        self.crop
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn class_label(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(|c| c.as_str())
    }
}

/// Summarize a photo into the [`LEAF_DIM`] statistics the centroids live in.
///
/// Channel values are scaled to [0, 1]. A pixel counts as green when its
/// green channel clearly dominates, and as lesion when it has the
/// red-brown cast of necrotic tissue.
pub fn leaf_features(image: &DynamicImage) -> [f32; LEAF_DIM] {
    let resized = image.resize_exact(LEAF_SIZE, LEAF_SIZE, FilterType::Triangle);
    let rgb = resized.to_rgb8();
    let n = (LEAF_SIZE * LEAF_SIZE) as f32;

    let mut sum = [0.0f32; 3];
    let mut sum_sq = [0.0f32; 3];
    let mut green = 0.0f32;
    let mut lesion = 0.0f32;

    for pixel in rgb.pixels() {
        let r = pixel[0] as f32 / 255.0;
        let g = pixel[1] as f32 / 255.0;
        let b = pixel[2] as f32 / 255.0;

        for (i, v) in [r, g, b].into_iter().enumerate() {
            sum[i] += v;
            sum_sq[i] += v * v;
        }
        if g > 0.2 && g > r * 1.15 && g > b * 1.15 {
            green += 1.0;
        }
        if r > 0.3 && g < r * 0.8 && b < r * 0.6 {
            lesion += 1.0;
        }
    }

    let mut out = [0.0f32; LEAF_DIM];
    for i in 0..3 {
        let mean = sum[i] / n;
        let var = (sum_sq[i] / n - mean * mean).max(0.0);
        out[i] = mean;
        out[i + 3] = var.sqrt();
    }
    out[6] = green / n;
    out[7] = lesion / n;
    out
}

fn sq_dist(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

fn argmin(dists: &[f32]) -> usize {
    let mut best = 0;
    for (i, d) in dists.iter().enumerate() {
        if *d < dists[best] {
            best = i;
        }
    }
    best
}

fn softmax_confidence(dists: &[f32], best: usize) -> f32 {
    let min = dists[best];
    let sum: f32 = dists.iter().map(|d| (-(d - min)).exp()).sum();
    (-(dists[best] - min)).exp() / sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn solid(rgb: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(32, 32, Rgb(rgb)))
    }

    fn model() -> LeafModel {
        LeafModel {
            crop: Crop::Tomato,
            version: "test".into(),
            classes: vec!["Early Blight".into(), "Healthy".into()],
            centroids: vec![
                vec![0.5, 0.35, 0.15, 0.1, 0.1, 0.08, 0.3, 0.45],
                vec![0.22, 0.56, 0.21, 0.07, 0.06, 0.05, 0.82, 0.04],
            ],
        }
    }

    #[test]
    fn solid_green_reads_as_foliage() {
        let features = leaf_features(&solid([60, 170, 60]));
        assert!((features[6] - 1.0).abs() < 1e-6, "green fraction");
        assert!(features[7] < 1e-6, "lesion fraction");
        assert!(features[3] < 1e-3, "solid colour has no spread");
    }

    #[test]
    fn solid_brown_reads_as_lesion() {
        let features = leaf_features(&solid([139, 69, 19]));
        assert!((features[7] - 1.0).abs() < 1e-6, "lesion fraction");
        assert!(features[6] < 1e-6, "green fraction");
    }

    #[test]
    fn green_leaf_classifies_healthy() {
        let m = model();
        let (idx, conf) = m.infer(&solid([60, 170, 60]));
        assert_eq!(m.class_label(idx), Some("Healthy"));
        assert!(conf > 0.5);
    }

    #[test]
    fn brown_leaf_classifies_diseased() {
        let m = model();
        let (idx, _) = m.infer(&solid([139, 69, 19]));
        assert_eq!(m.class_label(idx), Some("Early Blight"));
    }

    #[test]
    fn inference_is_deterministic() {
        let m = model();
        let img = solid([120, 110, 40]);
        let first = m.infer(&img);
        for _ in 0..5 {
            assert_eq!(m.infer(&img), first);
        }
    }

    #[test]
    fn features_are_size_invariant_for_solid_colour() {
        let small = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([60, 170, 60])));
        let large = DynamicImage::ImageRgb8(RgbImage::from_pixel(200, 120, Rgb([60, 170, 60])));
        let a = leaf_features(&small);
        let b = leaf_features(&large);
        for i in 0..LEAF_DIM {
            assert!(
                (a[i] - b[i]).abs() < 1e-3,
                "feature {i}: {} vs {}",
                a[i],
                b[i]
            );
        }
    }
}
