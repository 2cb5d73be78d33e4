//! logdiff: compare pre/post change device logs.
//!
//! # Usage
//!
//! ```text
//! logdiff [--config <path>] [-v] compare <pre> <post> [--json] [--changes-only]
//! logdiff [--config <path>] [-v] compare --sample [--json]
//! logdiff [--config <path>] [-v] batch <dir> [--out <dir>] [--format html|json|csv] [--json]
//! logdiff sample <pre|post>
//! ```

mod commands;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use commands::{batch::BatchArgs, compare::CompareArgs, sample::SampleArgs};
use logdiff_core::{config, Config, ReportFormat};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "logdiff",
    version,
    about = "Line-by-line comparison of pre/post change logs",
    long_about = None,
)]
struct Cli {
    /// Config file (default: ./logdiff.yaml, then the user config directory).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Debug logging on stderr (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compare one pre/post pair and print a side-by-side view.
    Compare(CompareArgs),

    /// Pair every pre/post file under a directory and compare them in order.
    Batch(BatchArgs),

    /// Print one of the bundled sample logs.
    Sample(SampleArgs),
}

// ---------------------------------------------------------------------------
// Shared ReportFormat argument
// ---------------------------------------------------------------------------

/// Thin wrapper so clap can parse `ReportFormat` from CLI args.
#[derive(Debug, Clone, Copy)]
pub struct ReportFormatArg(pub ReportFormat);

impl FromStr for ReportFormatArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "html" => Ok(Self(ReportFormat::Html)),
            "json" => Ok(Self(ReportFormat::Json)),
            "csv" => Ok(Self(ReportFormat::Csv)),
            other => Err(format!("unknown report format '{other}'; expected: html, json, csv")),
        }
    }
}

impl fmt::Display for ReportFormatArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            ReportFormat::Html => f.write_str("html"),
            ReportFormat::Json => f.write_str("json"),
            ReportFormat::Csv => f.write_str("csv"),
        }
    }
}

impl From<ReportFormatArg> for ReportFormat {
    fn from(f: ReportFormatArg) -> Self {
        f.0
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Compare(args) => args.run(&load_config(cli.config.as_deref())?),
        Commands::Batch(args) => args.run(&load_config(cli.config.as_deref())?),
        Commands::Sample(args) => args.run(),
    }
}

fn load_config(explicit: Option<&Path>) -> Result<Config> {
    config::load(explicit).context("failed to load configuration")
}

/// Logs go to stderr so `--json` output on stdout stays parseable.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
