use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Image decoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Turns uploaded photo bytes into owned pixel buffers and derives the
/// small preview the rendering side displays.
pub struct DecodeService {
    preview_size: u32,
}

impl DecodeService {
    pub fn new() -> Self {
        Self { preview_size: 300 }
    }

    /// Decode raw upload bytes. Fails with `DecodeError` on corrupt or
    /// unsupported input; callers decide whether to skip the file.
    pub fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
        Ok(image::load_from_memory(bytes)?)
    }

    /// Render a JPEG preview with the longest edge capped at the preview
    /// size, keeping aspect ratio.
    pub fn preview(&self, pixels: &DynamicImage) -> Result<Vec<u8>, DecodeError> {
        // JPEG has no alpha channel
        let thumb = pixels
            .thumbnail(self.preview_size, self.preview_size)
            .to_rgb8();

        let mut out = Cursor::new(Vec::new());
        thumb.write_to(&mut out, ImageFormat::Jpeg)?;
        Ok(out.into_inner())
    }
}

impl Default for DecodeService {
    fn default() -> Self {
        Self::new()
    }
}
