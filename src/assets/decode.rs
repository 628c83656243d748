use std::path::Path;

use anyhow::Context;

use crate::foundation::error::{ShowreelError, ShowreelResult};

/// A decoded product photograph: straight-alpha RGBA8, immutable once loaded.
#[derive(Clone, Debug)]
pub struct SourceImage {
    /// Width in pixels; always > 0.
    pub width: u32,
    /// Height in pixels; always > 0.
    pub height: u32,
    /// Pixel bytes, row-major, tightly packed.
    pub rgba8: Vec<u8>,
}

/// Decode an image from raw bytes.
///
/// Rejects undecodable data and zero-area images with
/// [`ShowreelError::InvalidImage`] so that downstream stages (letterboxing,
/// motion synthesis) never have to handle degenerate input.
pub fn decode_image(bytes: &[u8]) -> ShowreelResult<SourceImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| ShowreelError::invalid_image(format!("decode failed: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(ShowreelError::invalid_image(format!(
            "zero-area image ({width}x{height})"
        )));
    }

    Ok(SourceImage {
        width,
        height,
        rgba8: rgba.into_raw(),
    })
}

/// Read and decode an image file.
pub fn load_image(path: &Path) -> ShowreelResult<SourceImage> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    decode_image(&bytes).map_err(|e| match e {
        ShowreelError::InvalidImage(msg) => {
            ShowreelError::invalid_image(format!("{}: {msg}", path.display()))
        }
        other => other,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
