//! Static class tables and the mapping from raw class indices to
//! domain-meaningful results.
//!
//! The tables mirror the committed model artifacts class for class; the
//! registry verifies that agreement at load, so a mapping failure at
//! request time is an internal consistency fault, never user error.

use agrisense_core::Crop;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MappingError {
    #[error("class index {index} is outside the {table} table ({len} classes)")]
    UnknownClass {
        table: &'static str,
        index: usize,
        len: usize,
    },
}

/// Crop recommendation labels, in model class order.
pub const CROP_CLASSES: &[&str] = &[
    "rice",
    "maize",
    "chickpea",
    "kidneybeans",
    "pigeonpeas",
    "mothbeans",
    "mungbean",
    "blackgram",
    "lentil",
    "pomegranate",
    "banana",
    "mango",
    "grapes",
    "watermelon",
    "muskmelon",
    "apple",
    "orange",
    "papaya",
    "coconut",
    "cotton",
    "jute",
    "coffee",
];

/// A fertilizer product and its dosage guidance.
pub struct Fertilizer {
    pub name: &'static str,
    pub guidance: &'static str,
}

/// Fertilizer products, in model class order.
pub const FERTILIZERS: &[Fertilizer] = &[
    Fertilizer {
        name: "Urea",
        guidance: "Rich in nitrogen for leafy growth. Apply in two or three \
                   split doses and irrigate lightly afterwards to limit \
                   volatilisation losses.",
    },
    Fertilizer {
        name: "DAP",
        guidance: "High-phosphorus starter. Band near the root zone at \
                   sowing and avoid direct contact with seed.",
    },
    Fertilizer {
        name: "14-35-14",
        guidance: "Phosphorus-forward NPK blend for root establishment. \
                   Work into the topsoil before transplanting.",
    },
    Fertilizer {
        name: "28-28",
        guidance: "Balanced nitrogen and phosphorus without potash. Suited \
                   to potash-rich soils; topdress at tillering.",
    },
    Fertilizer {
        name: "17-17-17",
        guidance: "Balanced NPK maintenance blend. Broadcast evenly and \
                   incorporate before irrigation.",
    },
    Fertilizer {
        name: "20-20",
        guidance: "Nitrogen-phosphorus blend for early vegetative growth, \
                   particularly in light sandy soils.",
    },
    Fertilizer {
        name: "10-26-26",
        guidance: "Potash- and phosphorus-heavy blend. Apply at flowering \
                   and fruit set, when nitrogen demand is low.",
    },
];

// ── Per-crop disease class tables (model class order) ──

const APPLE: &[&str] = &["Apple Scab", "Black Rot", "Cedar Apple Rust", "Healthy"];
const CHERRY: &[&str] = &["Powdery Mildew", "Healthy"];
const CORN: &[&str] = &[
    "Gray Leaf Spot",
    "Common Rust",
    "Northern Leaf Blight",
    "Healthy",
];
const GRAPE: &[&str] = &[
    "Black Rot",
    "Esca (Black Measles)",
    "Leaf Blight",
    "Healthy",
];
const PEACH: &[&str] = &["Bacterial Spot", "Healthy"];
const PEPPER: &[&str] = &["Bacterial Spot", "Healthy"];
const POTATO: &[&str] = &["Early Blight", "Late Blight", "Healthy"];
const STRAWBERRY: &[&str] = &["Leaf Scorch", "Healthy"];
const TOMATO: &[&str] = &[
    "Bacterial Spot",
    "Early Blight",
    "Late Blight",
    "Leaf Mold",
    "Septoria Leaf Spot",
    "Spider Mites",
    "Target Spot",
    "Yellow Leaf Curl Virus",
    "Mosaic Virus",
    "Healthy",
];

/// Disease classes for a crop, in model class order.
pub fn disease_classes(crop: Crop) -> &'static [&'static str] {
    match crop {
        Crop::Apple => APPLE,
        Crop::Cherry => CHERRY,
        Crop::Corn => CORN,
        Crop::Grape => GRAPE,
        Crop::Peach => PEACH,
        Crop::Pepper => PEPPER,
        Crop::Potato => POTATO,
        Crop::Strawberry => STRAWBERRY,
        Crop::Tomato => TOMATO,
    }
}

// ── Index → label mapping ──

/// Map a crop model class index to its recommendation label.
pub fn crop_class(index: usize) -> Result<&'static str, MappingError> {
    CROP_CLASSES
        .get(index)
        .copied()
        .ok_or(MappingError::UnknownClass {
            table: "crop",
            index,
            len: CROP_CLASSES.len(),
        })
}

/// Map a fertilizer model class index to its product and guidance.
pub fn fertilizer_class(index: usize) -> Result<&'static Fertilizer, MappingError> {
    FERTILIZERS.get(index).ok_or(MappingError::UnknownClass {
        table: "fertilizer",
        index,
        len: FERTILIZERS.len(),
    })
}

/// Map a leaf model class index to its disease label for a crop.
pub fn disease_class(crop: Crop, index: usize) -> Result<&'static str, MappingError> {
    let classes = disease_classes(crop);
    classes
        .get(index)
        .copied()
        .ok_or(MappingError::UnknownClass {
            table: "disease",
            index,
            len: classes.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn crop_table_has_22_distinct_labels() {
        assert_eq!(CROP_CLASSES.len(), 22);
        let distinct: HashSet<&str> = CROP_CLASSES.iter().copied().collect();
        assert_eq!(distinct.len(), 22);
    }

    #[test]
    fn fertilizer_table_has_7_products_with_guidance() {
        assert_eq!(FERTILIZERS.len(), 7);
        for f in FERTILIZERS {
            assert!(!f.guidance.is_empty(), "{} has no guidance", f.name);
        }
    }

    #[test]
    fn every_crop_has_a_healthy_class() {
        for crop in Crop::ALL {
            assert!(
                disease_classes(*crop).contains(&"Healthy"),
                "{} table lacks a healthy class",
                crop.as_str()
            );
        }
    }

    #[test]
    fn disease_tables_cover_33_classes() {
        let total: usize = Crop::ALL.iter().map(|c| disease_classes(*c).len()).sum();
        assert_eq!(total, 33);
    }

    #[test]
    fn disease_labels_are_distinct_within_a_crop() {
        for crop in Crop::ALL {
            let classes = disease_classes(*crop);
            let distinct: HashSet<&str> = classes.iter().copied().collect();
            assert_eq!(distinct.len(), classes.len(), "{}", crop.as_str());
        }
    }

    #[test]
    fn mapping_happy_paths() {
        assert_eq!(crop_class(0).unwrap(), "rice");
        assert_eq!(crop_class(21).unwrap(), "coffee");
        assert_eq!(fertilizer_class(0).unwrap().name, "Urea");
        assert_eq!(disease_class(Crop::Tomato, 9).unwrap(), "Healthy");
        assert_eq!(disease_class(Crop::Potato, 0).unwrap(), "Early Blight");
    }

    #[test]
    fn out_of_range_index_is_a_mapping_error() {
        let err = crop_class(22).unwrap_err();
        assert!(matches!(
            err,
            MappingError::UnknownClass {
                table: "crop",
                index: 22,
                len: 22
            }
        ));
        assert!(fertilizer_class(7).is_err());
        assert!(disease_class(Crop::Cherry, 2).is_err());
    }
}
