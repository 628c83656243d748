//! Showreel turns still product photographs into marketing videos.
//!
//! The pipeline applies a Ken Burns pan-and-zoom to each photo, optionally
//! overlays branded text against the local background, appends a closing
//! trailer slide, and streams the frames into the system `ffmpeg` binary.
//!
//! # Pipeline overview
//!
//! 1. **Scan/decode**: product directory -> [`SourceImage`]s (bad files are
//!    skipped, never fatal for the product)
//! 2. **Plan**: [`RenderSettings`] + image count -> [`Storyboard`] (per-segment
//!    timing, pan directions, overlay picks)
//! 3. **Render**: letterbox -> Ken Burns synthesis -> text overlay, one
//!    segment at a time
//! 4. **Encode**: frames stream into `ffmpeg` as they are produced
//! 5. **Upload** (optional): best-effort hand-off to an [`UploadSink`]
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: pan directions and overlay messages come
//!   from a seeded stream ([`Rng64`]); a whole video is reproducible from its
//!   settings.
//! - **No IO in renderers**: fonts and the trailer slide are front-loaded;
//!   synthesis and overlay work purely on in-memory buffers.
//! - **Streaming**: no stage ever holds more than one frame of a video plus
//!   its letterboxed canvas; a video is never buffered whole.
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(missing_docs_in_private_items)]

mod assets;
mod batch;
mod encode;
mod foundation;
mod motion;
mod overlay;
mod storyboard;
mod timeline;
mod upload;

pub use assets::decode::{SourceImage, decode_image, load_image};
pub use assets::scan::{scan_product_dirs, scan_product_images};
pub use batch::driver::{BatchConfig, BatchDriver, BatchSummary, ProductReport, ProductStatus};
pub use encode::ffmpeg::{
    EncodeConfig, FfmpegEncoder, default_mp4_config, ensure_parent_dir, is_ffmpeg_on_path,
};
pub use foundation::core::{Canvas, Fps, FrameIndex, FrameRGBA, FrameRange};
pub use foundation::error::{ShowreelError, ShowreelResult};
pub use foundation::math::Rng64;
pub use motion::ease::Ease;
pub use motion::letterbox::letterbox;
pub use motion::synth::{KenBurnsFrames, synthesize};
pub use overlay::text::{TextBrushRgba8, TextRenderer};
pub use storyboard::model::{
    MotionSpec, OverlaySpec, PanDirection, Placement, RenderSettings, Segment, Storyboard,
};
pub use timeline::assemble::{AssembleStats, Assembler, FrameSink};
pub use upload::sink::{DirUploadSink, UploadSink};
