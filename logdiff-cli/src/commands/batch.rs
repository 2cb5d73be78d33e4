//! `logdiff batch <dir>`: pair, compare and summarize a whole directory.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use logdiff_core::{ComparisonTask, Config, ReportFormat, TaskStatus};
use logdiff_engine::{pair_directory, Batch, FsLoader, Progress, ProgressObserver};
use logdiff_renderer::{write_report, JsonReport, ReportInput, TemplateEngine};

use super::super::ReportFormatArg;

/// Arguments for `logdiff batch`.
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Directory containing `<key>_preCheck.log` / `<key>_postCheck.log` files.
    pub dir: PathBuf,

    /// Write a report into this directory.
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Report format: html | json | csv (default from config, else html).
    #[arg(long, value_name = "FORMAT", requires = "out")]
    pub format: Option<ReportFormatArg>,

    /// Hide identical rows on HTML diff pages.
    #[arg(long)]
    pub changes_only: bool,

    /// Print the summary as JSON instead of a table.
    #[arg(long)]
    pub json: bool,

    /// Directory of `.tera` files overriding the embedded templates.
    #[arg(long, value_name = "DIR", requires = "out")]
    pub templates: Option<PathBuf>,
}

impl BatchArgs {
    pub fn run(self, config: &Config) -> Result<()> {
        let pairing = pair_directory(&self.dir, &config.pairing)
            .with_context(|| format!("failed to pair files under '{}'", self.dir.display()))?;
        let patterns = config.scan.compile().context("invalid scan patterns")?;

        let mut batch = Batch::new(pairing.tasks).with_scan(patterns);
        let loader = FsLoader::with_lossy(config.loading.lossy_utf8);
        let summary = batch.run(&loader, &mut StderrProgress);
        let aggregate = batch.aggregate();

        let input = ReportInput {
            source: &self.dir,
            tasks: batch.tasks(),
            aggregate,
            orphans: &pairing.orphans,
        };

        let mut written = Vec::new();
        if let Some(out) = self.out.as_deref() {
            let format = self
                .format
                .map(ReportFormat::from)
                .unwrap_or(config.report.format);
            let engine = TemplateEngine::with_overrides(self.templates.as_deref())
                .context("failed to load report templates")?;
            written = write_report(
                out,
                &input,
                format,
                self.changes_only || config.report.changes_only,
                &engine,
            )
            .with_context(|| format!("failed to write report to '{}'", out.display()))?;
        }

        if self.json {
            let payload = JsonReport::new(&input);
            println!(
                "{}",
                serde_json::to_string_pretty(&payload).context("failed to serialize batch JSON")?
            );
            return Ok(());
        }

        if batch.is_empty() {
            println!(
                "No '*{}' files found under '{}'.",
                config.pairing.pre_suffix,
                self.dir.display()
            );
        } else {
            print_table(batch.tasks());
            println!(
                "{} task(s): {} completed, {} failed | {} difference(s): {} added, {} deleted, {} changed",
                batch.len(),
                summary.completed,
                summary.failed,
                aggregate.total,
                aggregate.added,
                aggregate.deleted,
                aggregate.changed,
            );
        }
        for orphan in &pairing.orphans {
            println!("{} no pre file for {}", "!".yellow().bold(), orphan.display());
        }
        if let Some(index) = written.first() {
            println!("✓ Report written: {}", index.display());
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Prints `[k/N] <id> <status>` to stderr as each task resolves.
struct StderrProgress;

impl ProgressObserver for StderrProgress {
    fn on_resolved(&mut self, _index: usize, task: &ComparisonTask, progress: Progress) {
        let status = match task.status {
            TaskStatus::Completed => task.status.to_string().green(),
            TaskStatus::Failed => task.status.to_string().red(),
            TaskStatus::Pending | TaskStatus::Processing => task.status.to_string().normal(),
        };
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(
            stderr,
            "[{}/{}] {} {}",
            progress.resolved, progress.total, task.id, status
        );
    }
}

// ---------------------------------------------------------------------------
// Summary table
// ---------------------------------------------------------------------------

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "host")]
    host: String,
    #[tabled(rename = "group")]
    group: String,
    #[tabled(rename = "status")]
    status: String,
    #[tabled(rename = "added")]
    added: String,
    #[tabled(rename = "deleted")]
    deleted: String,
    #[tabled(rename = "changed")]
    changed: String,
    #[tabled(rename = "errors pre→post")]
    errors: String,
    #[tabled(rename = "detail")]
    detail: String,
}

impl From<&ComparisonTask> for TaskRow {
    fn from(task: &ComparisonTask) -> Self {
        let (added, deleted, changed) = match task.stats() {
            Some(s) => (s.added.to_string(), s.deleted.to_string(), s.changed.to_string()),
            None => Default::default(),
        };
        Self {
            host: task.id.to_string(),
            group: task.group.clone().unwrap_or_else(|| "-".to_string()),
            status: task.status.to_string(),
            added,
            deleted,
            changed,
            errors: task
                .health
                .as_ref()
                .map(|h| format!("{} → {}", h.pre.errors, h.post.errors))
                .unwrap_or_default(),
            detail: task.error.clone().unwrap_or_default(),
        }
    }
}

fn print_table(tasks: &[ComparisonTask]) {
    let rows: Vec<TaskRow> = tasks.iter().map(TaskRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}
