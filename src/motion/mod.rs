pub mod ease;
pub mod letterbox;
pub mod synth;

use crate::{assets::decode::SourceImage, foundation::core::FrameRGBA};

/// View a source image as an `image` crate buffer for resampling.
///
/// Length mismatches cannot occur for images produced by `assets::decode`,
/// but the conversion stays total: short buffers are zero-padded rather
/// than panicking mid-render.
pub(crate) fn source_to_rgba_image(src: &SourceImage) -> image::RgbaImage {
    raw_to_rgba_image(src.width, src.height, src.rgba8.clone())
}

/// View a rendered frame as an `image` crate buffer for resampling.
pub(crate) fn frame_to_rgba_image(frame: &FrameRGBA) -> image::RgbaImage {
    raw_to_rgba_image(frame.width, frame.height, frame.data.clone())
}

/// Wrap an `image` crate buffer back into a frame.
pub(crate) fn rgba_image_to_frame(img: image::RgbaImage) -> FrameRGBA {
    let (width, height) = img.dimensions();
    FrameRGBA {
        width,
        height,
        data: img.into_raw(),
    }
}

fn raw_to_rgba_image(width: u32, height: u32, mut raw: Vec<u8>) -> image::RgbaImage {
    let len = (width as usize) * (height as usize) * 4;
    raw.resize(len, 0);
    image::RgbaImage::from_raw(width, height, raw)
        .unwrap_or_else(|| image::RgbaImage::new(width, height))
}
