use std::path::PathBuf;

use thiserror::Error;

use cover_junk_dat::DatError;

/// Errors that abort a cover rename run.
#[derive(Debug, Error)]
pub enum CoverError {
    /// I/O error while reading covers or writing output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory walk failed (permissions, vanished entries)
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Report could not be written
    #[error("Report error: {0}")]
    Csv(#[from] csv::Error),

    /// Catalog could not be loaded
    #[error("Catalog error: {0}")]
    Dat(#[from] DatError),

    /// A required input directory does not exist
    #[error("Directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),
}

impl CoverError {
    pub fn missing_directory(path: impl Into<PathBuf>) -> Self {
        Self::MissingDirectory(path.into())
    }
}
