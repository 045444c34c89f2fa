//! Directory scanner for cover image collections.
//!
//! Walks the cover tree lazily so large packs are never held in memory.
//! Used by the rename driver.

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::CoverError;

/// Image extensions recognised as covers (compared case-insensitively).
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp"];

/// A cover image found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverFile {
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

impl CoverFile {
    /// The bare file name, e.g. `Super Game.JPG`.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Lower-cased extension with its leading dot, e.g. `.jpg`.
    pub fn extension(&self) -> String {
        self.path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
            .unwrap_or_default()
    }
}

/// Check if a path has one of the [`IMAGE_EXTENSIONS`].
pub fn is_cover_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.iter().any(|x| x.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Lazily walk `dir` recursively, yielding cover images in file-name order
/// within each directory.
///
/// If `skip` is given, that directory (and everything under it) is not
/// visited. The rename driver uses this when the output directory lives
/// inside the cover directory.
pub fn scan_covers(
    dir: &Path,
    skip: Option<PathBuf>,
) -> impl Iterator<Item = Result<CoverFile, CoverError>> + use<> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |entry| skip.as_deref().is_none_or(|s| entry.path() != s))
        .filter_map(|entry| match entry {
            Ok(entry) => cover_file(&entry).transpose(),
            Err(e) => Some(Err(CoverError::from(e))),
        })
}

fn cover_file(entry: &DirEntry) -> Result<Option<CoverFile>, CoverError> {
    if !entry.file_type().is_file() || !is_cover_image(entry.path()) {
        return Ok(None);
    }
    let metadata = entry.metadata()?;
    Ok(Some(CoverFile {
        path: entry.path().to_path_buf(),
        size: metadata.len(),
    }))
}

#[cfg(test)]
#[path = "tests/scanner_tests.rs"]
mod tests;
