use indicatif::{ProgressBar, ProgressStyle};
use log::Level;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use cover_junk_dat::Normalizer;
use cover_junk_lib::rename::{RenameOptions, RenameProgress, load_index, rename_covers};

use crate::cli_types::RenameArgs;
use crate::error::CliError;

pub(crate) fn run_rename(args: RenameArgs, quiet: bool) -> Result<(), CliError> {
    let normalizer = Normalizer {
        recover_replacement_char: !args.no_replacement_fix,
    };

    log::info!(
        "Loading catalog: {}",
        args.dat.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    let index = load_index(&args.dat, &normalizer)?;
    log::info!(
        "{}",
        format!("{} name keys from {} games", index.len(), index.entry_count())
            .if_supports_color(Stdout, |t| t.dimmed()),
    );
    if index.skipped() > 0 {
        log::debug!("{} catalog games had no name or serial", index.skipped());
    }
    if args.dry_run {
        log::info!(
            "{}",
            "Dry run: no files will be copied".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }

    let options = RenameOptions {
        out_dir: args.out.clone(),
        report_name: args.report.clone(),
        dry_run: args.dry_run,
    };

    // Set up progress spinner (hidden in quiet mode)
    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("  {spinner:.cyan} {msg}") {
            pb.set_style(style.tick_chars("/-\\|"));
        }
        pb
    };

    let progress_callback = |progress: RenameProgress| match progress {
        RenameProgress::MatchingFile {
            ref file_name,
            file_index,
        } => {
            pb.set_message(format!("[{}] Matching {}", file_index + 1, file_name));
            pb.tick();
        }
        RenameProgress::Copied {
            ref file_name,
            ref target,
        } => {
            log::debug!("{} -> {}", file_name, target.display());
        }
        RenameProgress::Done => {
            pb.finish_and_clear();
        }
    };

    let result = rename_covers(&index, &normalizer, &args.covers, &options, &progress_callback);
    pb.finish_and_clear();
    let summary = result?;

    let level = if summary.unmatched > 0 {
        Level::Warn
    } else {
        Level::Info
    };
    log::info!(
        "  {} {} covers matched",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        summary.matched,
    );
    log::log!(
        level,
        "  {} {} covers without a catalog match",
        "?".if_supports_color(Stdout, |t| t.yellow()),
        summary.unmatched,
    );
    log::info!(
        "Done. Report written to: {}",
        summary
            .report_path
            .display()
            .if_supports_color(Stdout, |t| t.cyan()),
    );

    Ok(())
}
