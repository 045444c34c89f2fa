use std::path::{Path, PathBuf};

/// Errors that can occur while configuring or running an upload.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Source directory not found: {}", .0.display())]
    MissingSource(PathBuf),

    #[error("No files to upload in {}", .0.display())]
    EmptySource(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store error: {0}")]
    Store(String),
}

impl UploadError {
    pub fn missing_vars(names: &[&str]) -> Self {
        Self::Config(format!(
            "missing environment variables: {}",
            names.join(", ")
        ))
    }

    pub fn missing_source(path: &Path) -> Self {
        Self::MissingSource(path.to_path_buf())
    }

    pub fn empty_source(path: &Path) -> Self {
        Self::EmptySource(path.to_path_buf())
    }

    pub fn store(err: impl std::fmt::Display) -> Self {
        Self::Store(err.to_string())
    }
}
