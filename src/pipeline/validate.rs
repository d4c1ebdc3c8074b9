use std::path::Path;

use anyhow::{Context, Result};
use image::ImageFormat;

/// Largest upload the service accepts: 10 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// An image picked by the user: raw bytes plus what it claims to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Read a file from disk. The declared media type comes from the
    /// extension, the same way a browser file picker reports it.
    ///
    /// Type and size are checked against the file's metadata first, so a
    /// rejected file is never read. The error then carries the
    /// [`ValidationError`].
    pub fn open(path: &Path) -> Result<Self> {
        let not_readable = || {
            if !path.exists() {
                format!("file not found: {}", path.display())
            } else {
                format!("failed to read {}", path.display())
            }
        };
        let metadata = std::fs::metadata(path).with_context(not_readable)?;
        let media_type = media_type_for(path);
        validate(&media_type, metadata.len())?;

        let bytes = std::fs::read(path).with_context(not_readable)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(name, media_type, bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Media type implied by a file's extension.
pub fn media_type_for(path: &Path) -> String {
    if let Ok(format) = ImageFormat::from_path(path) {
        return format.to_mime_type().to_string();
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("txt") | Some("md") => "text/plain",
        Some("json") => "application/json",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
    .to_string()
}

/// Why a file was refused before any upload was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please upload an image file (PNG, JPG, JPEG)")]
    NotAnImage,
    #[error("Image must be smaller than 10MB")]
    TooLarge,
}

/// Check the declared media type, then the size.
pub fn validate(media_type: &str, size: u64) -> Result<(), ValidationError> {
    if !media_type.starts_with("image/") {
        return Err(ValidationError::NotAnImage);
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(ValidationError::TooLarge);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn accepts_png_at_limit() {
        assert_eq!(validate("image/png", MAX_UPLOAD_BYTES), Ok(()));
    }

    #[test]
    fn rejects_one_byte_over_limit() {
        assert_eq!(
            validate("image/jpeg", 10_485_761),
            Err(ValidationError::TooLarge)
        );
    }

    #[test]
    fn rejects_text_plain() {
        assert_eq!(validate("text/plain", 10), Err(ValidationError::NotAnImage));
    }

    #[test]
    fn type_is_checked_before_size() {
        assert_eq!(
            validate("application/pdf", MAX_UPLOAD_BYTES + 1),
            Err(ValidationError::NotAnImage)
        );
    }

    #[test]
    fn messages_match_user_wording() {
        assert_eq!(
            ValidationError::NotAnImage.to_string(),
            "Please upload an image file (PNG, JPG, JPEG)"
        );
        assert_eq!(
            ValidationError::TooLarge.to_string(),
            "Image must be smaller than 10MB"
        );
    }

    #[test]
    fn media_type_from_extension() {
        assert_eq!(media_type_for(Path::new("a.png")), "image/png");
        assert_eq!(media_type_for(Path::new("a.JPG")), "image/jpeg");
        assert_eq!(media_type_for(Path::new("notes.txt")), "text/plain");
        assert_eq!(
            media_type_for(Path::new("blob")),
            "application/octet-stream"
        );
    }

    #[test]
    fn open_missing_file() {
        let err = ImageFile::open(Path::new("/nonexistent/image.png"))
            .unwrap_err()
            .to_string();
        assert!(err.contains("file not found"), "got: {err}");
    }

    #[test]
    fn open_rejects_oversize_from_metadata() {
        let dir = std::env::temp_dir().join("chromapick-test-validate-oversize");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("huge.png");
        // sparse: the length is set without writing any data
        let file = std::fs::File::create(&path).unwrap();
        file.set_len(4 * 1024 * 1024 * 1024).unwrap();
        drop(file);

        let err = ImageFile::open(&path).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::TooLarge)
        );

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn open_rejects_non_image_before_size() {
        let dir = std::env::temp_dir().join("chromapick-test-validate-type");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("notes.txt");
        let file = std::fs::File::create(&path).unwrap();
        file.set_len(MAX_UPLOAD_BYTES + 1).unwrap();
        drop(file);

        let err = ImageFile::open(&path).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::NotAnImage)
        );
        assert_eq!(err.to_string(), "Please upload an image file (PNG, JPG, JPEG)");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn open_reads_bytes_and_type() {
        let dir = std::env::temp_dir().join("chromapick-test-validate-open");
        std::fs::create_dir_all(&dir).unwrap();
        let path: PathBuf = dir.join("pixel.png");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();

        let file = ImageFile::open(&path).unwrap();
        assert_eq!(file.name, "pixel.png");
        assert_eq!(file.media_type, "image/png");
        assert_eq!(file.size(), 3);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
