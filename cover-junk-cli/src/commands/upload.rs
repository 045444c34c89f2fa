use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use cover_junk_upload::{
    R2Store, RetryPolicy, UploadConfig, UploadOutcome, UploadSummary, collect_upload_files,
    upload_all,
};

use crate::cli_types::UploadArgs;
use crate::error::CliError;

pub(crate) fn run_upload(args: UploadArgs, quiet: bool) -> Result<(), CliError> {
    let config = UploadConfig::from_env()?.with_overrides(args.bucket, args.prefix);
    let files = collect_upload_files(&args.source)?;
    let total = files.len();
    let policy = RetryPolicy {
        max_attempts: args.retries.max(1),
        delay: Duration::from_millis(args.retry_delay_ms),
    };

    log::info!(
        "Starting upload to R2 bucket: {}",
        config.bucket.if_supports_color(Stdout, |t| t.cyan()),
    );
    log::info!("Source directory: {}", args.source.display());
    log::info!("Prefix: {}", config.prefix);
    log::info!("Found {} files to upload", total);
    log::info!(
        "{}",
        format!(
            "Workers: {}, Attempts: {}",
            args.workers.max(1),
            policy.max_attempts
        )
        .if_supports_color(Stdout, |t| t.dimmed()),
    );
    log::info!("");

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::runtime(format!("Failed to create async runtime: {}", e)))?;

    let summary = runtime.block_on(async {
        let store = Arc::new(R2Store::new(&config));

        let pb = if quiet {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new(total as u64);
            if let Ok(style) =
                ProgressStyle::with_template("  {spinner:.cyan} [{pos}/{len}] {wide_msg}")
            {
                pb.set_style(style.tick_chars("/-\\|"));
            }
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        };

        let report = |outcome: &UploadOutcome| {
            pb.inc(1);
            match &outcome.result {
                Ok(()) => {
                    pb.set_message(outcome.key.clone());
                    log::debug!("{} uploaded in {} attempt(s)", outcome.key, outcome.attempts);
                }
                Err(reason) => pb.suspend(|| {
                    log::warn!(
                        "  {} {}",
                        "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                        outcome.key,
                    );
                    log::warn!("    Error: {}", reason);
                }),
            }
        };

        let upload = upload_all(
            store,
            files,
            &config.prefix,
            args.workers,
            policy,
            report,
        );

        let result = tokio::select! {
            summary = upload => Ok(summary),
            _ = tokio::signal::ctrl_c() => Err(CliError::Interrupted),
        };
        pb.finish_and_clear();
        result
    })?;

    print_summary(&summary);

    if summary.is_success() {
        Ok(())
    } else {
        Err(CliError::upload(format!(
            "{} of {} files failed",
            summary.failed_count(),
            summary.total
        )))
    }
}

fn print_summary(summary: &UploadSummary) {
    let rule = "=".repeat(60);
    log::info!("{}", rule);
    log::info!("Upload complete!");
    log::info!("Total files: {}", summary.total);
    log::info!(
        "Successful: {}",
        summary
            .succeeded
            .if_supports_color(Stdout, |t| t.green()),
    );
    if summary.failed.is_empty() {
        log::info!("Failed: 0");
    } else {
        log::warn!(
            "Failed: {}",
            summary
                .failed_count()
                .if_supports_color(Stdout, |t| t.red()),
        );
        for outcome in &summary.failed {
            if let Err(reason) = &outcome.result {
                log::warn!("  {} ({} attempts): {}", outcome.file_name, outcome.attempts, reason);
            }
        }
    }
    log::info!("{}", rule);
}
