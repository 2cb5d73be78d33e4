//! Writing a finished batch to disk.
//!
//! HTML layout:
//!
//! ```text
//! <out>/index.html           summary of every task
//! <out>/diffs/<key>.html     one page per completed task
//! ```
//!
//! JSON layout is a single `<out>/report.json` without per-line rows, CSV a
//! single `<out>/report.csv` with one row per task.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use logdiff_core::types::{ComparisonTask, Stats, TaskHealth, TaskStatus};
use logdiff_core::ReportFormat;

use crate::context::{DiffPageContext, ReportContext};
use crate::engine::TemplateEngine;
use crate::error::{io_err, RenderError};
use crate::summary::SourceSummaries;

pub const INDEX_FILE: &str = "index.html";
pub const DIFFS_DIR: &str = "diffs";
pub const JSON_FILE: &str = "report.json";
pub const CSV_FILE: &str = "report.csv";
const CSV_HEADER: [&str; 6] = ["Folder", "IP", "Status", "Changed", "Added", "Removed"];

/// A finished (or stopped) batch, as handed to the writers.
#[derive(Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    /// Directory the tasks were paired from.
    pub source: &'a Path,
    pub tasks: &'a [ComparisonTask],
    pub aggregate: Stats,
    pub orphans: &'a [PathBuf],
}

impl ReportInput<'_> {
    fn orphan_names(&self) -> Vec<String> {
        self.orphans
            .iter()
            .map(|p| {
                p.strip_prefix(self.source)
                    .unwrap_or(p)
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Atomic write
// ---------------------------------------------------------------------------

/// Write `content` to `<path>.tmp` and rename it over `path`.
pub(crate) fn atomic_write(path: &Path, content: impl AsRef<[u8]>) -> Result<(), RenderError> {
    let tmp = PathBuf::from(format!("{}.tmp", path.display()));
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    std::fs::write(&tmp, content).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }
    tracing::debug!("wrote: {}", path.display());
    Ok(())
}

/// File name of a task's diff page. Characters outside `[A-Za-z0-9._-]`
/// become `_`.
pub fn page_name(task: &ComparisonTask) -> String {
    let safe: String = task
        .id
        .0
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{safe}.html")
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

/// Write the report in `format` and return every file written, index first.
pub fn write_report(
    out_dir: &Path,
    input: &ReportInput<'_>,
    format: ReportFormat,
    changes_only: bool,
    engine: &TemplateEngine,
) -> Result<Vec<PathBuf>, RenderError> {
    match format {
        ReportFormat::Html => write_html(out_dir, input, changes_only, engine),
        ReportFormat::Json => write_json(out_dir, input).map(|path| vec![path]),
        ReportFormat::Csv => write_csv(out_dir, input).map(|path| vec![path]),
    }
}

pub fn write_html(
    out_dir: &Path,
    input: &ReportInput<'_>,
    changes_only: bool,
    engine: &TemplateEngine,
) -> Result<Vec<PathBuf>, RenderError> {
    let summary = ReportContext::from_tasks(
        input.source.display().to_string(),
        input.tasks,
        input.aggregate,
        &input.orphan_names(),
        page_name,
    )
    .with_summaries(SourceSummaries::load(input.source));
    let index = out_dir.join(INDEX_FILE);
    atomic_write(&index, &engine.render_summary(&summary)?)?;
    let mut written = vec![index];

    let diffs = out_dir.join(DIFFS_DIR);
    for task in input.tasks {
        let Some(result) = task.result.as_ref().filter(|_| task.status == TaskStatus::Completed)
        else {
            continue;
        };
        let mut ctx = DiffPageContext::new(
            task.id.to_string(),
            file_label(&task.left),
            file_label(&task.right),
            result,
            changes_only,
        );
        ctx.in_report = true;
        let path = diffs.join(page_name(task));
        atomic_write(&path, &engine.render_diff(&ctx)?)?;
        written.push(path);
    }
    tracing::info!("report: {} file(s) under {}", written.len(), out_dir.display());
    Ok(written)
}

pub fn write_json(out_dir: &Path, input: &ReportInput<'_>) -> Result<PathBuf, RenderError> {
    let report = JsonReport::new(input);
    let path = out_dir.join(JSON_FILE);
    atomic_write(&path, &serde_json::to_string_pretty(&report)?)?;
    tracing::info!("report: {}", path.display());
    Ok(path)
}

/// One row per task: folder (group, or `root`), key, outcome and line counts.
///
/// Completed tasks report `identical` or `different`; the counts of tasks that
/// did not complete are left empty.
pub fn write_csv(out_dir: &Path, input: &ReportInput<'_>) -> Result<PathBuf, RenderError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for task in input.tasks {
        let folder = task.group.as_deref().unwrap_or("root");
        let id = task.id.to_string();
        match task.stats().filter(|_| task.status == TaskStatus::Completed) {
            Some(stats) => {
                let outcome = if stats.has_differences() {
                    "different"
                } else {
                    "identical"
                };
                let changed = stats.changed.to_string();
                let added = stats.added.to_string();
                let removed = stats.deleted.to_string();
                writer.write_record([
                    folder,
                    id.as_str(),
                    outcome,
                    changed.as_str(),
                    added.as_str(),
                    removed.as_str(),
                ])?;
            }
            None => {
                let status = task.status.to_string();
                writer.write_record([folder, id.as_str(), status.as_str(), "", "", ""])?;
            }
        }
    }
    let path = out_dir.join(CSV_FILE);
    let bytes = writer
        .into_inner()
        .map_err(|e| io_err(&path, e.into_error()))?;
    atomic_write(&path, bytes)?;
    tracing::info!("report: {}", path.display());
    Ok(path)
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ---------------------------------------------------------------------------
// JSON report
// ---------------------------------------------------------------------------

/// Machine-readable batch summary.
#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub aggregate: Stats,
    pub completed: usize,
    pub failed: usize,
    pub pending: usize,
    pub tasks: Vec<JsonTask>,
    pub orphans: Vec<String>,
    #[serde(skip_serializing_if = "SourceSummaries::is_empty")]
    pub summaries: SourceSummaries,
}

#[derive(Debug, Serialize)]
pub struct JsonTask {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub left: String,
    pub right: String,
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<Stats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<TaskHealth>,
}

impl JsonReport {
    pub fn new(input: &ReportInput<'_>) -> Self {
        let count = |status: TaskStatus| input.tasks.iter().filter(|t| t.status == status).count();
        let tasks = input
            .tasks
            .iter()
            .map(|t| JsonTask {
                id: t.id.to_string(),
                group: t.group.clone(),
                left: t.left.display().to_string(),
                right: t.right.display().to_string(),
                status: t.status,
                stats: t.stats(),
                error: t.error.clone(),
                health: t.health.clone(),
            })
            .collect();
        Self {
            generated_at: Utc::now(),
            source: input.source.display().to_string(),
            aggregate: input.aggregate,
            completed: count(TaskStatus::Completed),
            failed: count(TaskStatus::Failed),
            pending: count(TaskStatus::Pending) + count(TaskStatus::Processing),
            tasks,
            orphans: input.orphan_names(),
            summaries: SourceSummaries::load(input.source),
        }
    }
}
