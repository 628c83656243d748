use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::ShowreelResult;

const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// File-name substrings that mark an image as non-product material
/// (listing thumbnails, stock shots). Matched case-insensitively.
const EXCLUDED_NAME_TOKENS: [&str; 2] = ["thumbnail", "stock"];

/// List the usable product photos in a directory, sorted by file name.
///
/// Only PNG/JPEG files are considered, and anything whose name contains
/// "thumbnail" or "stock" (in any case) is excluded before the images ever
/// reach the pipeline.
pub fn scan_product_images(dir: &Path) -> ShowreelResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("read product directory '{}'", dir.display()))?;

    let mut images = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("read entry in '{}'", dir.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if !has_image_extension(&path) {
            continue;
        }
        if is_excluded_name(&path) {
            tracing::debug!(path = %path.display(), "excluding non-product image");
            continue;
        }
        images.push(path);
    }

    images.sort();
    Ok(images)
}

/// List the product subdirectories of a crops root, sorted by name.
pub fn scan_product_dirs(root: &Path) -> ShowreelResult<Vec<PathBuf>> {
    let entries =
        std::fs::read_dir(root).with_context(|| format!("read crops root '{}'", root.display()))?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("read entry in '{}'", root.display()))?;
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }

    dirs.sort();
    Ok(dirs)
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
}

fn is_excluded_name(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return true;
    };
    let lower = name.to_ascii_lowercase();
    EXCLUDED_NAME_TOKENS.iter().any(|t| lower.contains(t))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/scan.rs"]
mod tests;
