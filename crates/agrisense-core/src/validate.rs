//! Boundary validation: raw request fields in, typed domain values out.
//!
//! Every function here is a pure check with no side effects. Failures are
//! [`ValidationError`]s the caller can fix; nothing downstream of this
//! module re-validates.

use std::collections::HashMap;

use crate::catalog::{Crop, FertilizerCrop, SoilType};
use crate::error::ValidationError;
use crate::features::{CropFeatures, FertilizerFeatures};
use crate::upload::{ALLOWED_EXTENSIONS, ImageAsset, ImageUpload};

/// Field names of a crop recommendation request, in model order.
pub const CROP_FIELDS: &[&str] = &[
    "nitrogen",
    "phosphorus",
    "potassium",
    "temperature",
    "humidity",
    "ph",
    "rainfall",
];

/// Field names of a fertilizer recommendation request, in model order.
/// `soil` and `crop` carry positional category codes, not measurements.
pub const FERTILIZER_FIELDS: &[&str] = &[
    "temperature",
    "humidity",
    "moisture",
    "nitrogen",
    "potassium",
    "phosphorus",
    "soil",
    "crop",
];

/// Validate the raw fields of a crop recommendation request.
pub fn crop_features(fields: &HashMap<String, String>) -> Result<CropFeatures, ValidationError> {
    Ok(CropFeatures {
        nitrogen: numeric_field(fields, "nitrogen")?,
        phosphorus: numeric_field(fields, "phosphorus")?,
        potassium: numeric_field(fields, "potassium")?,
        temperature: numeric_field(fields, "temperature")?,
        humidity: numeric_field(fields, "humidity")?,
        ph: numeric_field(fields, "ph")?,
        rainfall: numeric_field(fields, "rainfall")?,
    })
}

/// Validate the raw fields of a fertilizer recommendation request.
///
/// The trailing `soil` and `crop` codes are resolved against the closed
/// enumerations; a code outside the range is [`ValidationError::UnknownCategory`].
pub fn fertilizer_features(
    fields: &HashMap<String, String>,
) -> Result<FertilizerFeatures, ValidationError> {
    let soil_code = category_field(fields, "soil")?;
    let crop_code = category_field(fields, "crop")?;

    let soil = SoilType::from_index(soil_code).ok_or(ValidationError::UnknownCategory {
        field: "soil".to_string(),
        index: soil_code,
    })?;
    let crop = FertilizerCrop::from_index(crop_code).ok_or(ValidationError::UnknownCategory {
        field: "crop".to_string(),
        index: crop_code,
    })?;

    Ok(FertilizerFeatures {
        temperature: numeric_field(fields, "temperature")?,
        humidity: numeric_field(fields, "humidity")?,
        moisture: numeric_field(fields, "moisture")?,
        nitrogen: numeric_field(fields, "nitrogen")?,
        potassium: numeric_field(fields, "potassium")?,
        phosphorus: numeric_field(fields, "phosphorus")?,
        soil,
        crop,
    })
}

/// Validate a crop identifier for disease detection.
pub fn crop_identifier(raw: &str) -> Result<Crop, ValidationError> {
    Crop::parse(raw).ok_or_else(|| ValidationError::UnknownCrop(raw.trim().to_string()))
}

/// Validate an uploaded leaf photo.
///
/// Checks run in surface order: presence, filename, extension allow-list,
/// then decode. Decoding here means inference never touches bytes that are
/// not a real image.
pub fn image(upload: Option<&ImageUpload>) -> Result<ImageAsset, ValidationError> {
    let upload = upload.ok_or(ValidationError::MissingFile)?;

    if upload.filename.trim().is_empty() {
        return Err(ValidationError::EmptyFilename);
    }

    let extension = upload.extension();
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ValidationError::DisallowedExtension { extension });
    }

    let image = image::load_from_memory(&upload.bytes)
        .map_err(|e| ValidationError::UndecodableImage(e.to_string()))?;

    Ok(ImageAsset::new(upload.filename.clone(), image))
}

// ── Field helpers ──

/// A measurement field: present, non-empty, and a finite number.
fn numeric_field(fields: &HashMap<String, String>, name: &str) -> Result<f64, ValidationError> {
    let value = fields
        .get(name)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ValidationError::FieldConversion {
            field: name.to_string(),
        })?;

    value
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| ValidationError::FieldConversion {
            field: name.to_string(),
        })
}

/// A category code field: present and a non-negative integer. Range
/// checking against the enumeration happens at the call site.
fn category_field(fields: &HashMap<String, String>, name: &str) -> Result<usize, ValidationError> {
    fields
        .get(name)
        .map(|v| v.trim())
        .and_then(|v| v.parse::<usize>().ok())
        .ok_or_else(|| ValidationError::FieldConversion {
            field: name.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn crop_fields() -> HashMap<String, String> {
        fields(&[
            ("nitrogen", "90"),
            ("phosphorus", "42"),
            ("potassium", "43"),
            ("temperature", "20.8"),
            ("humidity", "82.0"),
            ("ph", "6.5"),
            ("rainfall", "202.9"),
        ])
    }

    fn fertilizer_fields() -> HashMap<String, String> {
        fields(&[
            ("temperature", "26"),
            ("humidity", "52"),
            ("moisture", "38"),
            ("nitrogen", "37"),
            ("potassium", "0"),
            ("phosphorus", "0"),
            ("soil", "0"),
            ("crop", "4"),
        ])
    }

    fn png_bytes() -> Vec<u8> {
        let img = RgbImage::from_pixel(4, 4, Rgb([60, 170, 60]));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn crop_features_accepts_well_formed_fields() {
        let parsed = crop_features(&crop_fields()).unwrap();
        assert_eq!(parsed.nitrogen, 90.0);
        assert_eq!(parsed.rainfall, 202.9);
        assert_eq!(
            parsed.as_vector(),
            [90.0, 42.0, 43.0, 20.8, 82.0, 6.5, 202.9]
        );
    }

    #[test]
    fn missing_field_names_the_field() {
        let mut f = crop_fields();
        f.remove("ph");
        let err = crop_features(&f).unwrap_err();
        assert!(matches!(err, ValidationError::FieldConversion { field } if field == "ph"));
    }

    #[test]
    fn non_numeric_field_names_the_field() {
        let mut f = crop_fields();
        f.insert("humidity".into(), "very humid".into());
        let err = crop_features(&f).unwrap_err();
        assert!(matches!(err, ValidationError::FieldConversion { field } if field == "humidity"));
    }

    #[test]
    fn empty_field_is_a_conversion_error() {
        let mut f = crop_fields();
        f.insert("rainfall".into(), "  ".into());
        let err = crop_features(&f).unwrap_err();
        assert!(matches!(err, ValidationError::FieldConversion { field } if field == "rainfall"));
    }

    #[test]
    fn non_finite_values_are_rejected() {
        for bad in ["NaN", "inf", "-inf"] {
            let mut f = crop_fields();
            f.insert("temperature".into(), bad.into());
            let err = crop_features(&f).unwrap_err();
            assert!(
                matches!(err, ValidationError::FieldConversion { field } if field == "temperature"),
                "expected rejection for {bad}"
            );
        }
    }

    #[test]
    fn fertilizer_features_resolves_category_codes() {
        let parsed = fertilizer_features(&fertilizer_fields()).unwrap();
        assert_eq!(parsed.soil, SoilType::Sandy);
        assert_eq!(parsed.crop, FertilizerCrop::Paddy);
        assert_eq!(parsed.numeric_vector(), [26.0, 52.0, 38.0, 37.0, 0.0, 0.0]);
    }

    #[test]
    fn fertilizer_soil_code_out_of_range() {
        let mut f = fertilizer_fields();
        f.insert("soil".into(), "7".into());
        let err = fertilizer_features(&f).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::UnknownCategory { field, index: 7 } if field == "soil"
        ));
    }

    #[test]
    fn fertilizer_crop_code_out_of_range() {
        let mut f = fertilizer_fields();
        f.insert("crop".into(), "11".into());
        let err = fertilizer_features(&f).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::UnknownCategory { field, index: 11 } if field == "crop"
        ));
    }

    #[test]
    fn fertilizer_textual_category_is_a_conversion_error() {
        let mut f = fertilizer_fields();
        f.insert("soil".into(), "Loamy".into());
        let err = fertilizer_features(&f).unwrap_err();
        assert!(matches!(err, ValidationError::FieldConversion { field } if field == "soil"));
    }

    #[test]
    fn crop_identifier_accepts_supported_crops() {
        assert_eq!(crop_identifier("tomato").unwrap(), Crop::Tomato);
        assert_eq!(crop_identifier(" Grape ").unwrap(), Crop::Grape);
    }

    #[test]
    fn crop_identifier_rejects_unsupported() {
        let err = crop_identifier("banana").unwrap_err();
        assert!(matches!(err, ValidationError::UnknownCrop(c) if c == "banana"));
    }

    #[test]
    fn image_missing_upload() {
        let err = image(None).unwrap_err();
        assert!(matches!(err, ValidationError::MissingFile));
    }

    #[test]
    fn image_empty_filename() {
        let upload = ImageUpload::new("", png_bytes());
        let err = image(Some(&upload)).unwrap_err();
        assert!(matches!(err, ValidationError::EmptyFilename));
    }

    #[test]
    fn image_disallowed_extension() {
        let upload = ImageUpload::new("notes.txt", png_bytes());
        let err = image(Some(&upload)).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::DisallowedExtension { extension } if extension == "txt"
        ));
    }

    #[test]
    fn image_without_extension_is_disallowed() {
        let upload = ImageUpload::new("leaf", png_bytes());
        let err = image(Some(&upload)).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::DisallowedExtension { extension } if extension.is_empty()
        ));
    }

    #[test]
    fn image_extension_check_is_case_insensitive() {
        let upload = ImageUpload::new("leaf.PNG", png_bytes());
        assert!(image(Some(&upload)).is_ok());
    }

    #[test]
    fn image_undecodable_bytes() {
        let upload = ImageUpload::new("leaf.png", b"not an image".to_vec());
        let err = image(Some(&upload)).unwrap_err();
        assert!(matches!(err, ValidationError::UndecodableImage(_)));
    }

    #[test]
    fn image_valid_png_decodes() {
        let upload = ImageUpload::new("leaf.png", png_bytes());
        let asset = image(Some(&upload)).unwrap();
        assert_eq!(asset.filename(), "leaf.png");
        assert_eq!(asset.image().width(), 4);
        assert_eq!(asset.image().height(), 4);
    }
}
