use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{ShowreelError, ShowreelResult};

/// Destination for finished videos.
///
/// Implementations receive the local file plus its product identifier and
/// return an opaque identifier for the stored copy. Uploads are strictly
/// best-effort: a failure is reported but never invalidates the locally
/// produced video. Sinks are shared across batch worker threads, hence the
/// `Send + Sync` bound.
pub trait UploadSink: Send + Sync {
    /// Store the video; returns an opaque identifier on success.
    fn upload(&self, video: &Path, product_id: &str) -> ShowreelResult<String>;
}

/// Upload sink that copies videos into a destination directory.
///
/// Stands in for remote storage without pulling any cloud API into the
/// engine; the returned identifier is the destination path.
#[derive(Clone, Debug)]
pub struct DirUploadSink {
    dest: PathBuf,
}

impl DirUploadSink {
    /// Create a sink rooted at `dest`. The directory is created on demand.
    pub fn new(dest: impl Into<PathBuf>) -> Self {
        Self { dest: dest.into() }
    }
}

impl UploadSink for DirUploadSink {
    fn upload(&self, video: &Path, product_id: &str) -> ShowreelResult<String> {
        let run = || -> anyhow::Result<String> {
            std::fs::create_dir_all(&self.dest)
                .with_context(|| format!("create upload dir '{}'", self.dest.display()))?;
            let target = self.dest.join(format!("{product_id}.mp4"));
            std::fs::copy(video, &target)
                .with_context(|| format!("copy '{}' to '{}'", video.display(), target.display()))?;
            Ok(target.display().to_string())
        };
        run().map_err(|e| ShowreelError::upload(format!("{e:#}")))
    }
}
