use crate::{
    assets::decode::SourceImage,
    foundation::core::{FrameIndex, FrameRGBA},
    foundation::error::{ShowreelError, ShowreelResult},
    foundation::math::Rng64,
    motion::letterbox::letterbox,
    motion::synth::synthesize,
    overlay::text::TextRenderer,
    storyboard::model::{RenderSettings, Storyboard},
};

/// Consumer of the rendered frame stream, one frame at a time.
///
/// The assembler pushes frames as they are synthesized and never buffers a
/// whole video; the ffmpeg encoder is the production implementation and
/// tests plug in counting sinks.
pub trait FrameSink {
    /// Consume the next frame of the stream.
    fn write_frame(&mut self, frame: &FrameRGBA) -> ShowreelResult<()>;
}

/// Counters describing one assembled video.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AssembleStats {
    /// Segments streamed (one per source image).
    pub segments: usize,
    /// Segments that had a text overlay applied.
    pub overlays_applied: usize,
    /// Total frames pushed into the sink, trailer included.
    pub frames_written: u64,
}

/// Turns an ordered set of source images into one continuous frame stream.
///
/// One assembler instance owns its working buffers exclusively; separate
/// videos can run on separate threads, but a single video is rendered
/// strictly in order, one segment at a time.
pub struct Assembler {
    settings: RenderSettings,
    text: Option<TextRenderer>,
}

impl Assembler {
    /// Build an assembler after validating the settings.
    ///
    /// `text` is the prepared overlay renderer; IO (font loading) is
    /// front-loaded by the caller so assembly itself never reads files.
    pub fn new(settings: RenderSettings, text: Option<TextRenderer>) -> ShowreelResult<Self> {
        settings.validate()?;
        Ok(Self { settings, text })
    }

    /// Settings this assembler renders with.
    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Plan and stream a whole video.
    ///
    /// Fails with [`ShowreelError::NoSourceImages`] when `sources` is empty;
    /// undecodable images must have been dropped by the caller already.
    #[tracing::instrument(skip_all, fields(sources = sources.len()))]
    pub fn assemble(
        &mut self,
        sources: &[SourceImage],
        trailer: Option<&SourceImage>,
        sink: &mut dyn FrameSink,
        rng: &mut Rng64,
    ) -> ShowreelResult<AssembleStats> {
        let board = Storyboard::plan(&self.settings, sources.len(), trailer.is_some(), rng)?;
        self.run(&board, sources, trailer, sink, rng)
    }

    /// Stream an already-planned storyboard.
    pub fn run(
        &mut self,
        board: &Storyboard,
        sources: &[SourceImage],
        trailer: Option<&SourceImage>,
        sink: &mut dyn FrameSink,
        rng: &mut Rng64,
    ) -> ShowreelResult<AssembleStats> {
        if board.segments.len() != sources.len() {
            return Err(ShowreelError::validation(format!(
                "storyboard has {} segments for {} sources",
                board.segments.len(),
                sources.len()
            )));
        }

        let canvas = self.settings.canvas();
        let mut stats = AssembleStats::default();

        for (idx, (source, segment)) in sources.iter().zip(&board.segments).enumerate() {
            let base = letterbox(source, canvas);
            let frames = synthesize(&base, &segment.motion, rng)?;

            let mut overlaid = false;
            for (local, mut frame) in frames.enumerate() {
                if let Some(overlay) = &segment.overlay
                    && let Some(renderer) = self.text.as_mut()
                    && overlay.active.contains(FrameIndex(local as u64))
                {
                    frame = renderer.overlay(&frame, &overlay.text, overlay.placement)?;
                    overlaid = true;
                }
                sink.write_frame(&frame)?;
                stats.frames_written += 1;
            }

            if overlaid {
                stats.overlays_applied += 1;
            }
            stats.segments += 1;
            tracing::debug!(segment = idx, pan = ?segment.motion.pan, "segment streamed");
        }

        if let Some(trailer_img) = trailer
            && board.trailer_frames > 0
        {
            let slide = letterbox(trailer_img, canvas);
            for _ in 0..board.trailer_frames {
                sink.write_frame(&slide)?;
                stats.frames_written += 1;
            }
            tracing::debug!(frames = board.trailer_frames, "trailer streamed");
        }

        Ok(stats)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/assemble.rs"]
mod tests;
