//! cover-junk CLI
//!
//! Renames game cover images to their catalog serials and uploads the
//! results to Cloudflare R2.

mod cli_types;
mod commands;
mod error;

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use crate::cli_types::{Cli, Commands};
use crate::error::CliError;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Rename(args) => commands::rename::run_rename(args, cli.quiet),
        Commands::Upload(args) => commands::upload::run_upload(args, cli.quiet),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Interrupted) => {
            eprintln!("\n\n{}", CliError::Interrupted);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!(
                "{} {}",
                "ERROR:".if_supports_color(Stderr, |t| t.red()),
                e
            );
            ExitCode::FAILURE
        }
    }
}

/// Route `log` output to stdout.
///
/// Normal output is the bare message; `--verbose` adds timestamps and levels
/// and enables debug messages from this workspace's crates. `RUST_LOG` still
/// applies on top.
fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder
        .target(env_logger::Target::Stdout)
        .filter_level(LevelFilter::Warn)
        .filter_module("cover_junk", level);

    if verbose {
        builder.format_timestamp_millis().format_target(false);
    } else {
        builder.format(|buf, record| writeln!(buf, "{}", record.args()));
    }

    builder.parse_default_env().init();
}
