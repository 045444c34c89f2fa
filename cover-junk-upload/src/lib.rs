pub mod config;
pub mod error;
pub mod store;
pub mod upload;

pub use config::UploadConfig;
pub use error::UploadError;
pub use store::{ObjectStore, R2Store};
pub use upload::{
    DEFAULT_WORKERS, RetryPolicy, UploadOutcome, UploadSummary, collect_upload_files,
    remote_key, upload_all, upload_with_retry,
};
