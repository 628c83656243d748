use crate::{
    foundation::core::FrameRGBA,
    foundation::error::{ShowreelError, ShowreelResult},
    foundation::math::Rng64,
    motion::ease::Ease,
    motion::{frame_to_rgba_image, rgba_image_to_frame},
    storyboard::model::{MotionSpec, PanDirection},
};

/// Synthesize the Ken Burns frame sequence for one segment.
///
/// `canvas` is a letterboxed frame at the output resolution; the returned
/// iterator yields exactly `spec.duration_frames` frames of the same size,
/// in order. The sequence is finite and not restartable; call again to
/// regenerate. A `Random` pan direction is resolved once here, so the whole
/// segment drifts the same way.
#[tracing::instrument(skip(canvas, spec, rng), fields(frames = spec.duration_frames))]
pub fn synthesize(
    canvas: &FrameRGBA,
    spec: &MotionSpec,
    rng: &mut Rng64,
) -> ShowreelResult<KenBurnsFrames> {
    spec.validate()?;
    if canvas.width == 0 || canvas.height == 0 {
        return Err(ShowreelError::validation(
            "motion canvas must have non-zero dimensions",
        ));
    }

    Ok(KenBurnsFrames {
        canvas: frame_to_rgba_image(canvas),
        width: canvas.width,
        height: canvas.height,
        start_zoom: spec.start_zoom,
        end_zoom: spec.end_zoom,
        pan: spec.pan.resolve(rng),
        ease: spec.ease,
        duration: spec.duration_frames,
        next: 0,
    })
}

/// Finite frame iterator produced by [`synthesize`].
pub struct KenBurnsFrames {
    canvas: image::RgbaImage,
    width: u32,
    height: u32,
    start_zoom: f64,
    end_zoom: f64,
    pan: PanDirection,
    ease: Ease,
    duration: u64,
    next: u64,
}

/// Per-frame camera placement: scaled canvas size plus crop origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FrameGeometry {
    scaled_w: u32,
    scaled_h: u32,
    pan_x: u32,
    pan_y: u32,
}

/// Compute the camera placement for frame `i` of `n`.
///
/// Zoom interpolates from `start_zoom` to `end_zoom` over eased progress
/// `i / n`. The pan keeps the camera drifting off dead-center for the four
/// corner directions, with vertical travel damped to half the horizontal
/// rate; the x-offset of the right-hand directions mirrors via
/// `(1 - progress)`. Offsets are floored and clamped into the valid crop
/// window.
fn frame_geometry(
    width: u32,
    height: u32,
    i: u64,
    n: u64,
    start_zoom: f64,
    end_zoom: f64,
    pan: PanDirection,
    ease: Ease,
) -> FrameGeometry {
    let progress = ease.apply(i as f64 / n as f64);
    let zoom = start_zoom + (end_zoom - start_zoom) * progress;

    let scaled_w = ((f64::from(width) * zoom).floor() as u32).max(width);
    let scaled_h = ((f64::from(height) * zoom).floor() as u32).max(height);
    let over_x = f64::from(scaled_w - width);
    let over_y = f64::from(scaled_h - height);

    let (px, py) = match pan {
        PanDirection::TopLeft => (over_x * progress, over_y * progress * 0.5),
        PanDirection::TopRight => (over_x * (1.0 - progress), over_y * progress * 0.5),
        PanDirection::BottomLeft => (over_x * progress, over_y * (1.0 - progress * 0.5)),
        PanDirection::BottomRight => (over_x * (1.0 - progress), over_y * (1.0 - progress * 0.5)),
        // `Random` is resolved before synthesis; treat a stray value as a
        // plain center hold to keep frame generation total.
        PanDirection::Center | PanDirection::Random => (over_x * 0.5, over_y * 0.5),
    };

    let pan_x = (px.floor() as i64).clamp(0, i64::from(scaled_w - width)) as u32;
    let pan_y = (py.floor() as i64).clamp(0, i64::from(scaled_h - height)) as u32;

    FrameGeometry {
        scaled_w,
        scaled_h,
        pan_x,
        pan_y,
    }
}

impl KenBurnsFrames {
    fn render_frame(&self, i: u64) -> FrameRGBA {
        let geo = frame_geometry(
            self.width,
            self.height,
            i,
            self.duration,
            self.start_zoom,
            self.end_zoom,
            self.pan,
            self.ease,
        );

        let scaled = if geo.scaled_w == self.width && geo.scaled_h == self.height {
            self.canvas.clone()
        } else {
            image::imageops::resize(
                &self.canvas,
                geo.scaled_w,
                geo.scaled_h,
                image::imageops::FilterType::Triangle,
            )
        };

        let fits = geo.pan_x.saturating_add(self.width) <= geo.scaled_w
            && geo.pan_y.saturating_add(self.height) <= geo.scaled_h;
        if fits {
            let cropped =
                image::imageops::crop_imm(&scaled, geo.pan_x, geo.pan_y, self.width, self.height)
                    .to_image();
            rgba_image_to_frame(cropped)
        } else {
            // Cannot happen with clamped offsets, but a bad crop must only
            // cost this frame, never the segment: fall back to the
            // unzoomed canvas, which is already output-sized.
            tracing::warn!(frame = i, "crop out of bounds, falling back to canvas");
            rgba_image_to_frame(self.canvas.clone())
        }
    }
}

impl Iterator for KenBurnsFrames {
    type Item = FrameRGBA;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.duration {
            return None;
        }
        let i = self.next;
        self.next += 1;
        Some(self.render_frame(i))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.duration - self.next) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for KenBurnsFrames {}

#[cfg(test)]
#[path = "../../tests/unit/motion/synth.rs"]
mod tests;
