use crate::{
    assets::decode::SourceImage,
    foundation::core::{Canvas, FrameRGBA},
    motion::source_to_rgba_image,
};

/// Letterbox a source image onto a solid-black canvas of exactly
/// `canvas.width x canvas.height`.
///
/// The image is scaled by `min(target_w / w, target_h / h)` so the whole
/// picture fits without cropping, then centered with floor-division offsets.
/// The input is never mutated; calling twice yields byte-identical canvases.
/// Zero-area input is impossible here: decoding rejects it up front.
pub fn letterbox(image: &SourceImage, canvas: Canvas) -> FrameRGBA {
    let scale = f64::min(
        f64::from(canvas.width) / f64::from(image.width),
        f64::from(canvas.height) / f64::from(image.height),
    );
    // Extreme aspect ratios can floor a dimension to zero; clamp so the
    // resampler always has at least one row/column to work with.
    let scaled_w = ((f64::from(image.width) * scale).floor() as u32).max(1);
    let scaled_h = ((f64::from(image.height) * scale).floor() as u32).max(1);

    let src = source_to_rgba_image(image);
    let resized =
        image::imageops::resize(&src, scaled_w, scaled_h, image::imageops::FilterType::Triangle);

    let offset_x = ((canvas.width.saturating_sub(scaled_w)) / 2) as usize;
    let offset_y = ((canvas.height.saturating_sub(scaled_h)) / 2) as usize;

    let mut out = FrameRGBA::solid(canvas, [0, 0, 0, 255]);
    let dst_stride = (canvas.width as usize) * 4;
    let src_stride = (scaled_w as usize) * 4;
    let copy_w = (scaled_w.min(canvas.width) as usize) * 4;
    let copy_h = scaled_h.min(canvas.height) as usize;

    let resized_raw = resized.into_raw();
    for row in 0..copy_h {
        let dst_start = (offset_y + row) * dst_stride + offset_x * 4;
        let src_start = row * src_stride;
        out.data[dst_start..dst_start + copy_w]
            .copy_from_slice(&resized_raw[src_start..src_start + copy_w]);
    }

    out
}

#[cfg(test)]
#[path = "../../tests/unit/motion/letterbox.rs"]
mod tests;
