use thiserror::Error;

/// Errors that end a CLI command with a non-zero exit status.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// Catalog could not be read or parsed
    #[error("DAT error: {0}")]
    Dat(String),

    /// Cover scanning, copying or report writing failed
    #[error("{0}")]
    Rename(String),

    /// Missing credentials or bad settings
    #[error("Config error: {0}")]
    Config(String),

    /// Source directory missing or empty, or a batch with failures
    #[error("Upload error: {0}")]
    Upload(String),

    /// Runtime creation or async error
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Ctrl-C during an upload
    #[error("Upload cancelled by user")]
    Interrupted,
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn upload(msg: impl Into<String>) -> Self {
        Self::Upload(msg.into())
    }

    pub(crate) fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }
}

impl From<cover_junk_lib::CoverError> for CliError {
    fn from(err: cover_junk_lib::CoverError) -> Self {
        match err {
            cover_junk_lib::CoverError::Dat(e) => Self::Dat(e.to_string()),
            other => Self::Rename(other.to_string()),
        }
    }
}

impl From<cover_junk_upload::UploadError> for CliError {
    fn from(err: cover_junk_upload::UploadError) -> Self {
        match err {
            cover_junk_upload::UploadError::Config(msg) => Self::config(msg),
            other => Self::upload(other.to_string()),
        }
    }
}
