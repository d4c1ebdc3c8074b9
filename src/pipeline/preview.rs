use std::io::Cursor;

use image::{ImageFormat, ImageReader};

/// What the display shows of the picked image while colors are extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preview {
    pub width: u32,
    pub height: u32,
    pub format: Option<ImageFormat>,
}

impl Preview {
    /// Short label such as `640x480 PNG`.
    pub fn describe(&self) -> String {
        match self.format {
            Some(format) => format!(
                "{}x{} {}",
                self.width,
                self.height,
                format
                    .extensions_str()
                    .first()
                    .copied()
                    .unwrap_or("image")
                    .to_ascii_uppercase()
            ),
            None => format!("{}x{}", self.width, self.height),
        }
    }
}

/// Read only the image header to learn its dimensions.
///
/// Returns `None` when the bytes cannot be decoded; the upload still goes
/// ahead and the service decides whether the image is usable.
pub fn derive_preview(bytes: &[u8]) -> Option<Preview> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?;
    let format = reader.format();
    let (width, height) = reader.into_dimensions().ok()?;
    Some(Preview {
        width,
        height,
        format,
    })
}
