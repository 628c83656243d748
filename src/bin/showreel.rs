use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "showreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one product directory to an MP4 (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Render every product under a crops root.
    Batch(BatchArgs),
    /// Render a single timeline frame as a PNG (debugging aid).
    Frame(FrameArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Directory of product photos.
    #[arg(long)]
    images: PathBuf,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Render settings JSON (defaults are used when omitted).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the settings seed.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// Root directory with one subdirectory of crops per product.
    #[arg(long)]
    crops: PathBuf,

    /// Directory videos are written into.
    #[arg(long)]
    out_dir: PathBuf,

    /// Render settings JSON (defaults are used when omitted).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Upload finished videos into this directory (best-effort).
    #[arg(long)]
    upload_dir: Option<PathBuf>,

    /// Re-render products whose output already exists.
    #[arg(long, default_value_t = false)]
    force: bool,

    /// Render products in parallel on a worker pool.
    #[arg(long, default_value_t = false)]
    parallel: bool,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Directory of product photos.
    #[arg(long)]
    images: PathBuf,

    /// Timeline frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Render settings JSON (defaults are used when omitted).
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Batch(args) => cmd_batch(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn read_settings(path: Option<&Path>) -> anyhow::Result<showreel::RenderSettings> {
    let Some(path) = path else {
        return Ok(showreel::RenderSettings::default());
    };
    let f = File::open(path).with_context(|| format!("open settings '{}'", path.display()))?;
    let r = BufReader::new(f);
    let settings: showreel::RenderSettings =
        serde_json::from_reader(r).with_context(|| "parse settings JSON")?;
    Ok(settings)
}

fn load_sources(images_dir: &Path) -> anyhow::Result<Vec<showreel::SourceImage>> {
    let paths = showreel::scan_product_images(images_dir)?;
    let mut sources = Vec::with_capacity(paths.len());
    for path in &paths {
        match showreel::load_image(path) {
            Ok(img) => sources.push(img),
            Err(e) => eprintln!("skipping {}: {e}", path.display()),
        }
    }
    Ok(sources)
}

fn prepare_renderer(
    settings: &showreel::RenderSettings,
) -> anyhow::Result<Option<showreel::TextRenderer>> {
    if !settings.overlays_enabled() {
        return Ok(None);
    }
    let Some(font) = &settings.font_source else {
        return Ok(None);
    };
    Ok(Some(showreel::TextRenderer::from_font_file(
        font,
        settings.font_size_px,
    )?))
}

fn load_trailer(
    settings: &showreel::RenderSettings,
) -> anyhow::Result<Option<showreel::SourceImage>> {
    match &settings.trailer_source {
        Some(path) => Ok(Some(showreel::load_image(path)?)),
        None => Ok(None),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut settings = read_settings(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    settings.validate()?;

    let sources = load_sources(&args.images)?;
    let trailer = load_trailer(&settings)?;
    let renderer = prepare_renderer(&settings)?;

    let mut assembler = showreel::Assembler::new(settings.clone(), renderer)?;
    let cfg = showreel::default_mp4_config(&args.out, settings.width, settings.height, settings.fps);
    let mut encoder = showreel::FfmpegEncoder::new(cfg)?;
    let mut rng = showreel::Rng64::new(settings.seed);

    let stats = assembler.assemble(&sources, trailer.as_ref(), &mut encoder, &mut rng)?;
    encoder.finish()?;

    eprintln!(
        "wrote {} ({} segments, {} frames)",
        args.out.display(),
        stats.segments,
        stats.frames_written
    );
    Ok(())
}

fn cmd_batch(args: BatchArgs) -> anyhow::Result<()> {
    let settings = read_settings(args.config.as_deref())?;
    settings.validate()?;

    let cfg = showreel::BatchConfig {
        skip_existing: !args.force,
        parallel: args.parallel,
        ..showreel::BatchConfig::new(&args.crops, &args.out_dir)
    };

    let uploader = args.upload_dir.as_ref().map(showreel::DirUploadSink::new);
    let driver = showreel::BatchDriver::new(
        cfg,
        settings,
        uploader.as_ref().map(|u| u as &dyn showreel::UploadSink),
    )?;
    let summary = driver.run()?;

    for report in &summary.reports {
        match &report.status {
            showreel::ProductStatus::Succeeded => {
                let upload = report
                    .upload_id
                    .as_deref()
                    .map(|id| format!(", uploaded as {id}"))
                    .unwrap_or_default();
                eprintln!(
                    "{}: ok ({} segments, {} skipped{upload})",
                    report.product, report.segments_used, report.segments_skipped
                );
            }
            showreel::ProductStatus::Skipped => {
                eprintln!("{}: already exists, skipped", report.product);
            }
            showreel::ProductStatus::Failed(reason) => {
                eprintln!("{}: failed ({reason})", report.product);
            }
        }
    }
    eprintln!(
        "batch complete: {} succeeded, {} failed, {} skipped",
        summary.succeeded, summary.failed, summary.skipped
    );

    if summary.failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let settings = read_settings(args.config.as_deref())?;
    settings.validate()?;

    let sources = load_sources(&args.images)?;
    let trailer = load_trailer(&settings)?;
    let mut renderer = prepare_renderer(&settings)?;

    let mut rng = showreel::Rng64::new(settings.seed);
    let board = showreel::Storyboard::plan(&settings, sources.len(), trailer.is_some(), &mut rng)?;

    let frame = render_one_frame(
        &board,
        &sources,
        trailer.as_ref(),
        &settings,
        renderer.as_mut(),
        &mut rng,
        args.frame,
    )?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

/// Random access into the planned timeline: find the segment that owns the
/// frame index, synthesize just that segment, and pull the local frame out.
fn render_one_frame(
    board: &showreel::Storyboard,
    sources: &[showreel::SourceImage],
    trailer: Option<&showreel::SourceImage>,
    settings: &showreel::RenderSettings,
    mut renderer: Option<&mut showreel::TextRenderer>,
    rng: &mut showreel::Rng64,
    index: u64,
) -> anyhow::Result<showreel::FrameRGBA> {
    if index >= board.total_frames() {
        anyhow::bail!(
            "frame {index} is out of range (timeline has {} frames)",
            board.total_frames()
        );
    }

    let canvas = settings.canvas();
    let mut offset = 0u64;
    for (segment, source) in board.segments.iter().zip(sources) {
        let len = segment.motion.duration_frames;
        if index < offset + len {
            let local = index - offset;
            let base = showreel::letterbox(source, canvas);
            let mut frames = showreel::synthesize(&base, &segment.motion, rng)?;
            let mut frame = frames
                .nth(local as usize)
                .context("segment ended before requested frame (bug)")?;
            if let Some(overlay) = &segment.overlay
                && let Some(renderer) = renderer.as_deref_mut()
                && overlay.active.contains(showreel::FrameIndex(local))
            {
                frame = renderer.overlay(&frame, &overlay.text, overlay.placement)?;
            }
            return Ok(frame);
        }
        offset += len;
    }

    let trailer_img = trailer.context("frame index lands in a trailer that is not configured")?;
    Ok(showreel::letterbox(trailer_img, canvas))
}
