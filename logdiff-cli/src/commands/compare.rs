//! `logdiff compare <pre> <post>`: side-by-side view of one pair.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use logdiff_core::{Config, DiffResult, LineKind, LineRecord};
use logdiff_engine::{load_and_compare, FsLoader, MemoryLoader};

use super::sample::{SAMPLE_POST, SAMPLE_POST_NAME, SAMPLE_PRE, SAMPLE_PRE_NAME};

/// Text columns wider than this are truncated with `…`.
const MAX_COLUMN: usize = 60;

/// Arguments for `logdiff compare`.
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Log captured before the change.
    #[arg(required_unless_present = "sample", conflicts_with = "sample")]
    pub pre: Option<PathBuf>,

    /// Log captured after the change.
    #[arg(required_unless_present = "sample", conflicts_with = "sample")]
    pub post: Option<PathBuf>,

    /// Compare the bundled sample logs instead of files.
    #[arg(long)]
    pub sample: bool,

    /// Emit the aligned rows and stats as JSON.
    #[arg(long)]
    pub json: bool,

    /// Hide rows where both sides are identical.
    #[arg(long)]
    pub changes_only: bool,
}

impl CompareArgs {
    pub fn run(self, config: &Config) -> Result<()> {
        let (left_name, right_name, result) = if self.sample {
            let loader = MemoryLoader::new()
                .with(SAMPLE_PRE_NAME, SAMPLE_PRE)
                .with(SAMPLE_POST_NAME, SAMPLE_POST);
            let result = load_and_compare(
                &loader,
                Path::new(SAMPLE_PRE_NAME),
                Path::new(SAMPLE_POST_NAME),
            )
            .context("failed to load the bundled samples")?;
            (SAMPLE_PRE_NAME.to_string(), SAMPLE_POST_NAME.to_string(), result)
        } else {
            let pre = self.pre.as_deref().context("missing <PRE> path")?;
            let post = self.post.as_deref().context("missing <POST> path")?;
            let loader = FsLoader::with_lossy(config.loading.lossy_utf8);
            let result = load_and_compare(&loader, pre, post).with_context(|| {
                format!("cannot compare '{}' with '{}'", pre.display(), post.display())
            })?;
            (pre.display().to_string(), post.display().to_string(), result)
        };

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&result).context("failed to serialize diff JSON")?
            );
            return Ok(());
        }

        println!("{}  →  {}", left_name.bold(), right_name.bold());
        let hidden = print_rows(&result, self.changes_only || config.report.changes_only);
        print_footer(&result, hidden);
        Ok(())
    }
}

/// Print aligned rows; returns how many identical rows were skipped.
fn print_rows(result: &DiffResult, changes_only: bool) -> usize {
    let width = result
        .left
        .iter()
        .map(|r| r.text.chars().count())
        .max()
        .unwrap_or(0)
        .min(MAX_COLUMN);
    let separator = "│".bright_black();

    let mut hidden = 0;
    for (left, right) in result.rows() {
        if changes_only && left.kind == LineKind::Identical && right.kind == LineKind::Identical {
            hidden += 1;
            continue;
        }
        println!(
            "{} {separator} {}",
            cell(left, width, true),
            cell(right, MAX_COLUMN, false)
        );
    }
    hidden
}

fn print_footer(result: &DiffResult, hidden: usize) {
    let stats = result.stats;
    println!();
    if hidden > 0 {
        println!("{}", format!("{hidden} identical line(s) hidden").bright_black());
    }
    if !stats.has_differences() {
        println!("{} no differences ({} lines)", "✓".green(), result.len());
        return;
    }
    println!(
        "{} difference(s): {} added, {} deleted, {} changed",
        stats.total,
        stats.added.to_string().green(),
        stats.deleted.to_string().red(),
        stats.changed.to_string().yellow(),
    );
}

fn cell(record: &LineRecord, width: usize, pad: bool) -> String {
    let number = record.number.map(|n| n.to_string()).unwrap_or_default();
    let text = fit(&record.text, width);
    let body = if pad {
        format!("{number:>4} {} {text:<width$}", marker(record.kind))
    } else {
        format!("{number:>4} {} {text}", marker(record.kind))
    };
    match record.kind {
        LineKind::Identical => body,
        LineKind::Added => body.green().to_string(),
        LineKind::Deleted => body.red().to_string(),
        LineKind::Changed => body.yellow().to_string(),
        LineKind::Empty => body.bright_black().to_string(),
    }
}

fn marker(kind: LineKind) -> char {
    match kind {
        LineKind::Identical | LineKind::Empty => ' ',
        LineKind::Added => '+',
        LineKind::Deleted => '-',
        LineKind::Changed => '~',
    }
}

fn fit(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}
