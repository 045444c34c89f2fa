pub mod error;
pub mod rename;
pub mod scanner;
pub mod worker_pool;

pub use error::CoverError;
pub use rename::{
    CoverStatus, DEFAULT_REPORT_NAME, RenameOptions, RenameProgress, RenameSummary, ReportRow,
    load_index, match_cover, rename_covers,
};
pub use scanner::{CoverFile, IMAGE_EXTENSIONS, is_cover_image, scan_covers};
pub use worker_pool::WorkerPool;
