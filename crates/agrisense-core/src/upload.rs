//! Uploaded leaf photos: the raw form handed over by the surface, and the
//! validated, decoded form the pipeline works with.

use image::DynamicImage;

/// File extensions accepted for leaf photos (lowercase, no dot).
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp"];

/// A file upload exactly as received: filename and raw bytes, nothing
/// checked yet.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    /// Extension after the last dot, lowercased. Empty if there is no dot.
    pub fn extension(&self) -> String {
        match self.filename.rsplit_once('.') {
            Some((_, ext)) => ext.to_ascii_lowercase(),
            None => String::new(),
        }
    }
}

/// A validated upload: allow-listed extension and successfully decoded
/// pixels. Only [`validate::image`](crate::validate::image) constructs one,
/// so inference never sees undecodable content.
#[derive(Debug, Clone)]
pub struct ImageAsset {
    filename: String,
    image: DynamicImage,
}

impl ImageAsset {
    pub(crate) fn new(filename: String, image: DynamicImage) -> Self {
        Self { filename, image }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_lowercased() {
        let upload = ImageUpload::new("Leaf.JPG", vec![]);
        assert_eq!(upload.extension(), "jpg");
    }

    #[test]
    fn extension_uses_last_dot() {
        let upload = ImageUpload::new("leaf.tar.png", vec![]);
        assert_eq!(upload.extension(), "png");
    }

    #[test]
    fn extension_empty_without_dot() {
        let upload = ImageUpload::new("leaf", vec![]);
        assert_eq!(upload.extension(), "");
    }
}
