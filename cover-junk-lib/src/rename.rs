use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use cover_junk_dat::{CoverIndex, Normalizer, parse_dat_file};

use crate::error::CoverError;
use crate::scanner::{CoverFile, scan_covers};

/// Report file name used when none is given.
pub const DEFAULT_REPORT_NAME: &str = "rename_report.csv";

const REPORT_HEADER: [&str; 3] = ["cover", "gamecode", "status"];

/// Outcome for one cover file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverStatus {
    Ok,
    NoMatch,
}

impl std::fmt::Display for CoverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::NoMatch => write!(f, "no_match"),
        }
    }
}

/// One line of the CSV report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    /// Source file name
    pub cover: String,
    /// Matched identifier, empty on no match
    pub gamecode: String,
    pub status: CoverStatus,
}

/// Options controlling a rename run.
#[derive(Debug, Clone)]
pub struct RenameOptions {
    /// Directory receiving renamed covers and the report (created if absent)
    pub out_dir: PathBuf,
    /// Report file name inside `out_dir`
    pub report_name: String,
    /// Compute and report matches without copying any image
    pub dry_run: bool,
}

impl RenameOptions {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            report_name: DEFAULT_REPORT_NAME.to_string(),
            dry_run: false,
        }
    }
}

/// Progress information for callbacks.
#[derive(Debug, Clone)]
pub enum RenameProgress {
    /// Matching a cover file
    MatchingFile { file_name: String, file_index: usize },
    /// A matched cover was copied to its new name
    Copied { file_name: String, target: PathBuf },
    /// All files processed
    Done,
}

/// Summary of a rename run.
#[derive(Debug, Clone, Default)]
pub struct RenameSummary {
    pub matched: usize,
    pub unmatched: usize,
    pub report_path: PathBuf,
}

impl RenameSummary {
    pub fn total(&self) -> usize {
        self.matched + self.unmatched
    }
}

/// Parse a catalog file and build its cover index.
pub fn load_index(dat_path: &Path, normalizer: &Normalizer) -> Result<CoverIndex, CoverError> {
    let dat = parse_dat_file(dat_path)?;
    let index = CoverIndex::from_dat(&dat, normalizer);
    log::debug!(
        "Catalog {:?}: {} games, {} indexed, {} skipped, {} keys",
        dat.name,
        dat.games.len(),
        index.entry_count(),
        index.skipped(),
        index.len()
    );
    Ok(index)
}

/// Match a single cover against the index. The cover gets exactly one key,
/// taken from its bare file name.
pub fn match_cover(index: &CoverIndex, normalizer: &Normalizer, file: &CoverFile) -> ReportRow {
    let cover = file.file_name();
    let key = normalizer.normalize_file_name(&cover);
    match index.lookup(&key) {
        Some(code) => ReportRow {
            cover,
            gamecode: code.to_string(),
            status: CoverStatus::Ok,
        },
        None => ReportRow {
            cover,
            gamecode: String::new(),
            status: CoverStatus::NoMatch,
        },
    }
}

/// Match every cover under `covers_dir` and copy hits to
/// `<out_dir>/<ID><ext>`, writing one report row per cover in scan order.
///
/// Two covers resolving to the same identifier are not detected: the later
/// copy overwrites the earlier one.
pub fn rename_covers(
    index: &CoverIndex,
    normalizer: &Normalizer,
    covers_dir: &Path,
    options: &RenameOptions,
    on_progress: &dyn Fn(RenameProgress),
) -> Result<RenameSummary, CoverError> {
    if !covers_dir.is_dir() {
        return Err(CoverError::missing_directory(covers_dir));
    }
    fs::create_dir_all(&options.out_dir)?;

    let covers_dir = covers_dir.canonicalize()?;
    let out_dir = options.out_dir.canonicalize()?;
    // A nested output directory is not re-scanned; an output directory equal
    // to the cover directory is scanned like any other run
    let skip = (out_dir != covers_dir && out_dir.starts_with(&covers_dir))
        .then(|| out_dir.clone());

    let report_path = out_dir.join(&options.report_name);
    let mut report = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(&report_path)?;
    report.write_record(REPORT_HEADER)?;

    let mut summary = RenameSummary {
        report_path,
        ..Default::default()
    };

    for (file_index, file) in scan_covers(&covers_dir, skip).enumerate() {
        let file = file?;
        let row = match_cover(index, normalizer, &file);
        on_progress(RenameProgress::MatchingFile {
            file_name: row.cover.clone(),
            file_index,
        });

        match row.status {
            CoverStatus::Ok => {
                summary.matched += 1;
                let target = out_dir.join(format!("{}{}", row.gamecode, file.extension()));
                if options.dry_run {
                    log::debug!("{} -> {} (dry run)", row.cover, target.display());
                } else if target == file.path {
                    log::debug!("{} is already named {}", row.cover, target.display());
                } else {
                    fs::copy(&file.path, &target)?;
                    on_progress(RenameProgress::Copied {
                        file_name: row.cover.clone(),
                        target,
                    });
                }
            }
            CoverStatus::NoMatch => {
                summary.unmatched += 1;
                log::debug!("No catalog match for {}", row.cover);
            }
        }

        report.serialize(&row)?;
    }

    report.flush()?;
    on_progress(RenameProgress::Done);
    Ok(summary)
}

#[cfg(test)]
#[path = "tests/rename_tests.rs"]
mod tests;
