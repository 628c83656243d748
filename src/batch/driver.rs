use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::{
    assets::decode::{SourceImage, load_image},
    assets::scan::{scan_product_dirs, scan_product_images},
    encode::ffmpeg::{FfmpegEncoder, default_mp4_config},
    foundation::error::{ShowreelError, ShowreelResult},
    foundation::math::{Rng64, hash_str},
    overlay::text::TextRenderer,
    storyboard::model::RenderSettings,
    timeline::assemble::Assembler,
    upload::sink::UploadSink,
};

/// Batch run configuration: where products live and where videos go.
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Root directory containing one subdirectory of crops per product.
    pub crops_root: PathBuf,
    /// Directory finished videos are written into.
    pub out_dir: PathBuf,
    /// Skip products whose output file already exists.
    pub skip_existing: bool,
    /// Render products on a rayon pool instead of sequentially. Pipelines
    /// share no state, so this is safe whole-video parallelism.
    pub parallel: bool,
}

impl BatchConfig {
    /// Sequential batch over `crops_root`, writing into `out_dir`.
    pub fn new(crops_root: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            crops_root: crops_root.into(),
            out_dir: out_dir.into(),
            skip_existing: true,
            parallel: false,
        }
    }
}

/// Terminal state of one product in a batch run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProductStatus {
    /// The video exists locally. Upload may or may not have succeeded.
    Succeeded,
    /// The output already existed and was left alone.
    Skipped,
    /// No video was produced; the message says why.
    Failed(String),
}

/// Per-product outcome, aggregated into a [`BatchSummary`].
#[derive(Clone, Debug)]
pub struct ProductReport {
    /// Product identifier (the crop directory name).
    pub product: String,
    /// Terminal state.
    pub status: ProductStatus,
    /// Path of the produced video, when one exists.
    pub video: Option<PathBuf>,
    /// Segments rendered into the video.
    pub segments_used: usize,
    /// Source images dropped because they failed to decode.
    pub segments_skipped: usize,
    /// Identifier returned by the upload sink, when the upload succeeded.
    pub upload_id: Option<String>,
}

/// Aggregated result of a batch run.
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Products whose video exists locally.
    pub succeeded: usize,
    /// Products that produced no video.
    pub failed: usize,
    /// Products skipped because their output already existed.
    pub skipped: usize,
    /// Every per-product report, in product order.
    pub reports: Vec<ProductReport>,
}

/// Walks a crops root and produces one video per product directory.
///
/// Failures are contained at two levels: a bad photo only costs its own
/// segment, and a failed product only costs that product; the batch always
/// continues. Nothing is retried automatically.
pub struct BatchDriver<'a> {
    cfg: BatchConfig,
    settings: RenderSettings,
    font_bytes: Option<Vec<u8>>,
    trailer: Option<SourceImage>,
    uploader: Option<&'a dyn UploadSink>,
}

impl<'a> BatchDriver<'a> {
    /// Build a driver, front-loading all shared IO (font file, trailer
    /// slide) so per-product work starts from memory.
    pub fn new(
        cfg: BatchConfig,
        settings: RenderSettings,
        uploader: Option<&'a dyn UploadSink>,
    ) -> ShowreelResult<Self> {
        settings.validate()?;

        let font_bytes = match &settings.font_source {
            Some(path) => {
                use anyhow::Context as _;
                Some(
                    std::fs::read(path)
                        .with_context(|| format!("read overlay font '{}'", path.display()))?,
                )
            }
            None => None,
        };

        let trailer = match &settings.trailer_source {
            Some(path) => Some(load_image(path)?),
            None => None,
        };

        Ok(Self {
            cfg,
            settings,
            font_bytes,
            trailer,
            uploader,
        })
    }

    /// Process every product directory under the crops root.
    #[tracing::instrument(skip(self))]
    pub fn run(&self) -> ShowreelResult<BatchSummary> {
        let product_dirs = scan_product_dirs(&self.cfg.crops_root)?;
        tracing::info!(products = product_dirs.len(), "starting batch");

        let reports: Vec<ProductReport> = if self.cfg.parallel {
            product_dirs
                .par_iter()
                .map(|dir| self.process_product(dir))
                .collect()
        } else {
            product_dirs
                .iter()
                .map(|dir| self.process_product(dir))
                .collect()
        };

        let mut summary = BatchSummary {
            reports,
            ..BatchSummary::default()
        };
        for report in &summary.reports {
            match report.status {
                ProductStatus::Succeeded => summary.succeeded += 1,
                ProductStatus::Skipped => summary.skipped += 1,
                ProductStatus::Failed(_) => summary.failed += 1,
            }
        }

        tracing::info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            skipped = summary.skipped,
            "batch complete"
        );
        Ok(summary)
    }

    /// Render, encode and (best-effort) upload one product.
    fn process_product(&self, product_dir: &Path) -> ProductReport {
        let product = product_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| product_dir.display().to_string());
        let out_path = self.cfg.out_dir.join(format!("{product}.mp4"));

        let mut report = ProductReport {
            product: product.clone(),
            status: ProductStatus::Skipped,
            video: None,
            segments_used: 0,
            segments_skipped: 0,
            upload_id: None,
        };

        if self.cfg.skip_existing && out_path.exists() {
            tracing::info!(%product, "output exists, skipping");
            report.video = Some(out_path);
            return report;
        }

        match self.render_product(&product, product_dir, &out_path, &mut report) {
            Ok(()) => {
                report.status = ProductStatus::Succeeded;
                report.video = Some(out_path.clone());

                // Upload failure intentionally still counts the product as a
                // success: the video exists locally either way.
                if let Some(uploader) = self.uploader {
                    match uploader.upload(&out_path, &product) {
                        Ok(id) => {
                            tracing::info!(%product, %id, "uploaded");
                            report.upload_id = Some(id);
                        }
                        Err(e) => {
                            tracing::warn!(%product, error = %e, "upload failed, video kept locally");
                        }
                    }
                }
            }
            Err(e) => {
                tracing::warn!(%product, error = %e, "product failed");
                report.status = ProductStatus::Failed(e.to_string());
            }
        }

        report
    }

    fn render_product(
        &self,
        product: &str,
        product_dir: &Path,
        out_path: &Path,
        report: &mut ProductReport,
    ) -> ShowreelResult<()> {
        let image_paths = scan_product_images(product_dir)?;

        let mut sources = Vec::with_capacity(image_paths.len());
        for path in &image_paths {
            match load_image(path) {
                Ok(img) => sources.push(img),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping bad source image");
                    report.segments_skipped += 1;
                }
            }
        }
        if sources.is_empty() {
            return Err(ShowreelError::no_source_images(format!(
                "product '{product}' has no usable images"
            )));
        }

        let text = match (&self.font_bytes, self.settings.overlays_enabled()) {
            (Some(bytes), true) => Some(TextRenderer::new(
                bytes.clone(),
                self.settings.font_size_px,
            )?),
            _ => None,
        };
        let mut assembler = Assembler::new(self.settings.clone(), text)?;

        let cfg = default_mp4_config(
            out_path,
            self.settings.width,
            self.settings.height,
            self.settings.fps,
        );
        let mut encoder = FfmpegEncoder::new(cfg)?;

        let mut rng = Rng64::new(self.settings.seed ^ hash_str(product));
        match assembler.assemble(&sources, self.trailer.as_ref(), &mut encoder, &mut rng) {
            Ok(stats) => {
                encoder.finish()?;
                report.segments_used = stats.segments;
                tracing::info!(
                    product,
                    frames = stats.frames_written,
                    overlays = stats.overlays_applied,
                    "video encoded"
                );
                Ok(())
            }
            Err(e) => {
                // Let ffmpeg drain, then make sure no partial file survives.
                let _ = encoder.finish();
                let _ = std::fs::remove_file(out_path);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/batch/driver.rs"]
mod tests;
