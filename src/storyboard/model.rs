use std::path::PathBuf;

use crate::{
    foundation::core::{Canvas, Fps, FrameIndex, FrameRange},
    foundation::error::{ShowreelError, ShowreelResult},
    foundation::math::Rng64,
    motion::ease::Ease,
};

/// All knobs for one product video.
///
/// There are no ambient constants anywhere in the engine: output paths,
/// folder layout and timing all flow through this structure, constructed by
/// the caller and passed into the assembler and batch driver.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct RenderSettings {
    /// Output frame width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,
    /// Output frame height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,
    /// Output frame rate (whole frames per second).
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Total video duration in seconds, trailer included.
    #[serde(default = "default_total_secs")]
    pub total_secs: f64,
    /// Seconds reserved at the tail for the trailer slide.
    #[serde(default = "default_trailer_secs")]
    pub trailer_secs: f64,
    /// Zoom factor at the start of every segment; >= 1.0.
    #[serde(default = "default_zoom_start")]
    pub zoom_start: f64,
    /// Zoom factor at the end of every segment; >= `zoom_start`.
    #[serde(default = "default_zoom_end")]
    pub zoom_end: f64,
    /// Easing curve for zoom/pan progress.
    #[serde(default)]
    pub ease: Ease,
    /// Messages to pick from when a segment gets a text overlay.
    #[serde(default = "default_message_pool")]
    pub message_pool: Vec<String>,
    /// Overlay every Nth segment (0-based); `0` disables overlays.
    #[serde(default = "default_overlay_frequency")]
    pub overlay_frequency: u32,
    /// Where overlay text is placed on the frame.
    #[serde(default)]
    pub overlay_placement: Placement,
    /// Font file used for overlay text. Overlays are skipped when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_source: Option<PathBuf>,
    /// Overlay font size in pixels.
    #[serde(default = "default_font_size_px")]
    pub font_size_px: f32,
    /// Closing slide appended after all segments. Omitted when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trailer_source: Option<PathBuf>,
    /// Seed for the deterministic random stream (pan directions, messages).
    #[serde(default)]
    pub seed: u64,
}

fn default_width() -> u32 {
    1920
}

fn default_height() -> u32 {
    1080
}

fn default_fps() -> u32 {
    30
}

fn default_total_secs() -> f64 {
    45.0
}

fn default_trailer_secs() -> f64 {
    3.0
}

fn default_zoom_start() -> f64 {
    1.0
}

fn default_zoom_end() -> f64 {
    1.3
}

fn default_overlay_frequency() -> u32 {
    2
}

fn default_font_size_px() -> f32 {
    64.0
}

fn default_message_pool() -> Vec<String> {
    [
        "Own a piece of history",
        "Invest in timeless art",
        "Elevate your space",
        "Curated for collectors",
        "Authenticated & verified",
        "Limited edition excellence",
        "Art that tells a story",
        "Museum-quality artwork",
        "Collectible masterpiece",
        "Gallery-worthy investment",
        "Rare find for discerning collectors",
        "Transform your walls",
        "Certified authentic artwork",
        "Hand-signed by the artist",
        "Ready to display",
        "Professionally curated",
        "A statement piece",
        "Timeless pop culture art",
    ]
    .into_iter()
    .map(str::to_owned)
    .collect()
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            fps: default_fps(),
            total_secs: default_total_secs(),
            trailer_secs: default_trailer_secs(),
            zoom_start: default_zoom_start(),
            zoom_end: default_zoom_end(),
            ease: Ease::default(),
            message_pool: default_message_pool(),
            overlay_frequency: default_overlay_frequency(),
            overlay_placement: Placement::default(),
            font_source: None,
            font_size_px: default_font_size_px(),
            trailer_source: None,
            seed: 0,
        }
    }
}

impl RenderSettings {
    /// Output canvas dimensions.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Output frame rate as a rational [`Fps`].
    pub fn fps(&self) -> ShowreelResult<Fps> {
        Fps::new(self.fps, 1)
    }

    /// Validate all settings invariants.
    pub fn validate(&self) -> ShowreelResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ShowreelError::validation("output width/height must be > 0"));
        }
        if self.fps == 0 {
            return Err(ShowreelError::validation("fps must be > 0"));
        }
        if !self.total_secs.is_finite() || self.total_secs <= 0.0 {
            return Err(ShowreelError::validation(
                "total_secs must be finite and > 0",
            ));
        }
        if !self.trailer_secs.is_finite() || self.trailer_secs < 0.0 {
            return Err(ShowreelError::validation(
                "trailer_secs must be finite and >= 0",
            ));
        }
        if self.trailer_secs >= self.total_secs {
            return Err(ShowreelError::validation(
                "trailer_secs must leave time for at least one segment",
            ));
        }
        if !self.zoom_start.is_finite() || self.zoom_start < 1.0 {
            return Err(ShowreelError::validation(
                "zoom_start must be finite and >= 1.0",
            ));
        }
        if !self.zoom_end.is_finite() || self.zoom_end < self.zoom_start {
            return Err(ShowreelError::validation(
                "zoom_end must be finite and >= zoom_start",
            ));
        }
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(ShowreelError::validation(
                "font_size_px must be finite and > 0",
            ));
        }
        Ok(())
    }

    /// Whether the overlay policy can produce any overlays at all.
    pub fn overlays_enabled(&self) -> bool {
        self.overlay_frequency > 0 && !self.message_pool.is_empty() && self.font_source.is_some()
    }
}

/// Vertical placement zone for overlay text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Placement {
    /// Upper third of the frame.
    Top,
    /// Middle third of the frame.
    Center,
    /// Lower third of the frame.
    #[default]
    Bottom,
}

/// Direction the virtual camera drifts while zooming in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PanDirection {
    /// Drift toward the top-left corner.
    TopLeft,
    /// Drift toward the top-right corner.
    TopRight,
    /// Drift toward the bottom-left corner.
    BottomLeft,
    /// Drift toward the bottom-right corner.
    BottomRight,
    /// Hold the center; zoom only.
    Center,
    /// Resolve to one of the five named directions, uniformly, once per
    /// segment.
    Random,
}

impl PanDirection {
    /// The five concrete directions `Random` resolves over.
    pub const NAMED: [PanDirection; 5] = [
        PanDirection::TopLeft,
        PanDirection::TopRight,
        PanDirection::BottomLeft,
        PanDirection::BottomRight,
        PanDirection::Center,
    ];

    /// Collapse `Random` into a named direction using `rng`; named
    /// directions pass through unchanged without consuming randomness.
    pub fn resolve(self, rng: &mut Rng64) -> PanDirection {
        match self {
            PanDirection::Random => Self::NAMED[rng.pick_index(Self::NAMED.len())],
            named => named,
        }
    }
}

/// One segment's camera trajectory. Fully determines the rendered frames
/// for that segment; constructed per segment and consumed once.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct MotionSpec {
    /// Zoom at progress 0; >= 1.0.
    pub start_zoom: f64,
    /// Zoom at progress 1; >= `start_zoom`.
    pub end_zoom: f64,
    /// Camera drift direction.
    pub pan: PanDirection,
    /// Number of frames to synthesize; > 0.
    pub duration_frames: u64,
    /// Easing applied to progress.
    #[serde(default)]
    pub ease: Ease,
}

impl MotionSpec {
    /// Validate trajectory invariants.
    pub fn validate(&self) -> ShowreelResult<()> {
        if !self.start_zoom.is_finite() || self.start_zoom < 1.0 {
            return Err(ShowreelError::validation(
                "motion start_zoom must be finite and >= 1.0",
            ));
        }
        if !self.end_zoom.is_finite() || self.end_zoom < self.start_zoom {
            return Err(ShowreelError::validation(
                "motion end_zoom must be finite and >= start_zoom",
            ));
        }
        if self.duration_frames == 0 {
            return Err(ShowreelError::validation(
                "motion duration_frames must be > 0",
            ));
        }
        Ok(())
    }
}

/// Text overlay applied to part of one segment.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct OverlaySpec {
    /// The message; short strings only, no wrapping is performed.
    pub text: String,
    /// Placement zone on the frame.
    pub placement: Placement,
    /// Segment-local frame range `[start, end)` the overlay is active for.
    pub active: FrameRange,
}

/// One planned segment: trajectory plus optional overlay.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Segment {
    /// Camera trajectory for this segment.
    pub motion: MotionSpec,
    /// Overlay applied during the middle of the segment, if any.
    pub overlay: Option<OverlaySpec>,
}

/// A fully planned output timeline: one segment per source image, plus the
/// trailer hold at the tail.
///
/// Planning is separated from rendering so the timing invariant (segment
/// durations summing to the configured total, within rounding) can be
/// checked without touching pixels, and so the random stream is consumed in
/// one predictable order: per segment, pan direction first, then the message
/// pick when that segment is overlaid.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Storyboard {
    /// Planned segments in source order.
    pub segments: Vec<Segment>,
    /// Frames of trailer hold appended after all segments.
    pub trailer_frames: u64,
}

impl Storyboard {
    /// Plan a timeline for `source_count` valid images.
    ///
    /// Fails with [`ShowreelError::NoSourceImages`] when there is nothing to
    /// render; the caller is expected to have already dropped undecodable
    /// entries.
    pub fn plan(
        settings: &RenderSettings,
        source_count: usize,
        has_trailer: bool,
        rng: &mut Rng64,
    ) -> ShowreelResult<Self> {
        settings.validate()?;
        if source_count == 0 {
            return Err(ShowreelError::no_source_images(
                "cannot plan a timeline for zero source images",
            ));
        }

        let fps = settings.fps()?;
        let per_segment_secs =
            (settings.total_secs - settings.trailer_secs) / (source_count as f64);
        let per_segment_frames = fps.secs_to_frames_round(per_segment_secs);
        if per_segment_frames == 0 {
            return Err(ShowreelError::validation(format!(
                "per-segment duration {per_segment_secs:.3}s rounds to zero frames at {} fps",
                settings.fps
            )));
        }

        let overlays = settings.overlays_enabled();
        let mut segments = Vec::with_capacity(source_count);
        for idx in 0..source_count {
            let pan = PanDirection::Random.resolve(rng);
            let motion = MotionSpec {
                start_zoom: settings.zoom_start,
                end_zoom: settings.zoom_end,
                pan,
                duration_frames: per_segment_frames,
                ease: settings.ease,
            };

            let overlay = if overlays && idx as u32 % settings.overlay_frequency == 0 {
                let text = settings.message_pool[rng.pick_index(settings.message_pool.len())]
                    .clone();
                Some(OverlaySpec {
                    text,
                    placement: settings.overlay_placement,
                    active: FrameRange::new(
                        FrameIndex(per_segment_frames / 3),
                        FrameIndex(2 * per_segment_frames / 3),
                    )?,
                })
            } else {
                None
            };

            segments.push(Segment { motion, overlay });
        }

        let trailer_frames = if has_trailer {
            fps.secs_to_frames_round(settings.trailer_secs)
        } else {
            0
        };

        Ok(Self {
            segments,
            trailer_frames,
        })
    }

    /// Total frames this storyboard will produce.
    pub fn total_frames(&self) -> u64 {
        self.segments
            .iter()
            .map(|s| s.motion.duration_frames)
            .sum::<u64>()
            + self.trailer_frames
    }
}

#[cfg(test)]
#[path = "../../tests/unit/storyboard/model.rs"]
mod tests;
