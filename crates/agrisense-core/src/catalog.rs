//! Closed agronomy enumerations.
//!
//! Every categorical input is a member of one of these enums, so an unknown
//! value is a construction error at the boundary rather than an
//! index-out-of-range somewhere inside a predictor.

use serde::{Deserialize, Serialize};

/// Crops with a registered leaf-disease classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Crop {
    Apple,
    Cherry,
    Corn,
    Grape,
    Peach,
    Pepper,
    Potato,
    Strawberry,
    Tomato,
}

impl Crop {
    pub const ALL: &[Crop] = &[
        Crop::Apple,
        Crop::Cherry,
        Crop::Corn,
        Crop::Grape,
        Crop::Peach,
        Crop::Pepper,
        Crop::Potato,
        Crop::Strawberry,
        Crop::Tomato,
    ];

    /// Parse a crop identifier as submitted by the surface (case-insensitive).
    pub fn parse(raw: &str) -> Option<Crop> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "apple" => Some(Crop::Apple),
            "cherry" => Some(Crop::Cherry),
            "corn" => Some(Crop::Corn),
            "grape" => Some(Crop::Grape),
            "peach" => Some(Crop::Peach),
            "pepper" => Some(Crop::Pepper),
            "potato" => Some(Crop::Potato),
            "strawberry" => Some(Crop::Strawberry),
            "tomato" => Some(Crop::Tomato),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Crop::Apple => "apple",
            Crop::Cherry => "cherry",
            Crop::Corn => "corn",
            Crop::Grape => "grape",
            Crop::Peach => "peach",
            Crop::Pepper => "pepper",
            Crop::Potato => "potato",
            Crop::Strawberry => "strawberry",
            Crop::Tomato => "tomato",
        }
    }
}

/// Soil types accepted by the fertilizer recommender, in the positional
/// order the surface encodes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoilType {
    Sandy,
    Loamy,
    Black,
    Red,
    Clayey,
}

impl SoilType {
    pub const ALL: &[SoilType] = &[
        SoilType::Sandy,
        SoilType::Loamy,
        SoilType::Black,
        SoilType::Red,
        SoilType::Clayey,
    ];

    /// Resolve a positional category code from the request surface.
    pub fn from_index(index: usize) -> Option<SoilType> {
        Self::ALL.get(index).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SoilType::Sandy => "Sandy",
            SoilType::Loamy => "Loamy",
            SoilType::Black => "Black",
            SoilType::Red => "Red",
            SoilType::Clayey => "Clayey",
        }
    }
}

/// Crop types accepted by the fertilizer recommender, in the positional
/// order the surface encodes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FertilizerCrop {
    Maize,
    Sugarcane,
    Cotton,
    Tobacco,
    Paddy,
    Barley,
    Wheat,
    Millets,
    #[serde(rename = "Oil seeds")]
    OilSeeds,
    Pulses,
    #[serde(rename = "Ground Nuts")]
    GroundNuts,
}

impl FertilizerCrop {
    pub const ALL: &[FertilizerCrop] = &[
        FertilizerCrop::Maize,
        FertilizerCrop::Sugarcane,
        FertilizerCrop::Cotton,
        FertilizerCrop::Tobacco,
        FertilizerCrop::Paddy,
        FertilizerCrop::Barley,
        FertilizerCrop::Wheat,
        FertilizerCrop::Millets,
        FertilizerCrop::OilSeeds,
        FertilizerCrop::Pulses,
        FertilizerCrop::GroundNuts,
    ];

    /// Resolve a positional category code from the request surface.
    pub fn from_index(index: usize) -> Option<FertilizerCrop> {
        Self::ALL.get(index).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FertilizerCrop::Maize => "Maize",
            FertilizerCrop::Sugarcane => "Sugarcane",
            FertilizerCrop::Cotton => "Cotton",
            FertilizerCrop::Tobacco => "Tobacco",
            FertilizerCrop::Paddy => "Paddy",
            FertilizerCrop::Barley => "Barley",
            FertilizerCrop::Wheat => "Wheat",
            FertilizerCrop::Millets => "Millets",
            FertilizerCrop::OilSeeds => "Oil seeds",
            FertilizerCrop::Pulses => "Pulses",
            FertilizerCrop::GroundNuts => "Ground Nuts",
        }
    }
}
