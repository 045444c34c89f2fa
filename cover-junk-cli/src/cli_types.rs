//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use cover_junk_lib::DEFAULT_REPORT_NAME;
use cover_junk_upload::DEFAULT_WORKERS;

#[derive(Parser)]
#[command(name = "cover-junk")]
#[command(about = "Rename game cover images to catalog serials and publish them", long_about = None)]
pub(crate) struct Cli {
    /// Only show warnings and errors (suppress normal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Match cover images against a No-Intro DAT and copy them as <SERIAL>.<ext>
    Rename(RenameArgs),

    /// Upload renamed covers to a Cloudflare R2 bucket
    Upload(UploadArgs),
}

#[derive(Args, Clone)]
pub(crate) struct RenameArgs {
    /// No-Intro DAT file (Logiqx XML or ClrMamePro)
    #[arg(long)]
    pub dat: PathBuf,

    /// Directory containing cover images (searched recursively)
    #[arg(long)]
    pub covers: PathBuf,

    /// Output directory for renamed covers and the report (created if absent)
    #[arg(long)]
    pub out: PathBuf,

    /// Report file name, written inside the output directory
    #[arg(long, default_value = DEFAULT_REPORT_NAME)]
    pub report: String,

    /// Write the report without copying any image
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Keep U+FFFD replacement characters instead of reading them as 'e'
    #[arg(long)]
    pub no_replacement_fix: bool,
}

#[derive(Args, Clone)]
pub(crate) struct UploadArgs {
    /// Directory holding the files to upload (not searched recursively)
    #[arg(long, default_value = "covers_renamed")]
    pub source: PathBuf,

    /// Number of concurrent uploads
    #[arg(short, long, default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Attempts per file before giving up
    #[arg(long, default_value_t = 3)]
    pub retries: u32,

    /// Pause between attempts, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub retry_delay_ms: u64,

    /// Bucket name (overrides CLOUDFLARE_R2_BUCKET_NAME)
    #[arg(long)]
    pub bucket: Option<String>,

    /// Key prefix inside the bucket (overrides CLOUDFLARE_R2_PREFIX)
    #[arg(long)]
    pub prefix: Option<String>,
}
