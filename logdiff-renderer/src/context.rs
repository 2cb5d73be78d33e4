//! Template contexts: serializable rendering payloads built from tasks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use logdiff_core::types::{
    ComparisonTask, DiffResult, LineKind, LineRecord, Stats, TaskHealth, TaskStatus,
};

use crate::error::RenderError;
use crate::summary::SourceSummaries;

/// One side of one row on a diff page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellCtx {
    /// CSS class: `identical`, `added`, `deleted`, `changed` or `empty`.
    pub class: String,
    pub number: Option<usize>,
    pub text: String,
    /// Gutter marker.
    pub marker: String,
}

impl From<&LineRecord> for CellCtx {
    fn from(record: &LineRecord) -> Self {
        let marker = match record.kind {
            LineKind::Identical => " ",
            LineKind::Added => "+",
            LineKind::Deleted => "-",
            LineKind::Changed => "~",
            LineKind::Empty => "",
        };
        Self {
            class: record.kind.as_str().to_string(),
            number: record.number,
            text: record.text.clone(),
            marker: marker.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowCtx {
    pub left: CellCtx,
    pub right: CellCtx,
}

/// Stats plus bar widths (percent of the largest of added/deleted/changed).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsCtx {
    pub total: usize,
    pub added: usize,
    pub deleted: usize,
    pub changed: usize,
    pub added_pct: u32,
    pub deleted_pct: u32,
    pub changed_pct: u32,
}

impl From<Stats> for StatsCtx {
    fn from(stats: Stats) -> Self {
        let max = stats.added.max(stats.deleted).max(stats.changed).max(1);
        let pct = |v: usize| ((v * 100) / max) as u32;
        Self {
            total: stats.total,
            added: stats.added,
            deleted: stats.deleted,
            changed: stats.changed,
            added_pct: pct(stats.added),
            deleted_pct: pct(stats.deleted),
            changed_pct: pct(stats.changed),
        }
    }
}

/// Context for `diff.html.tera`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffPageContext {
    pub title: String,
    pub left_name: String,
    pub right_name: String,
    pub stats: StatsCtx,
    pub rows: Vec<RowCtx>,
    /// Rows hidden because they were identical.
    pub hidden_rows: usize,
    /// Rendered as part of a batch report (adds a link back to the summary).
    pub in_report: bool,
    pub generated_at: DateTime<Utc>,
}

impl DiffPageContext {
    pub fn new(
        title: impl Into<String>,
        left_name: impl Into<String>,
        right_name: impl Into<String>,
        result: &DiffResult,
        changes_only: bool,
    ) -> Self {
        let mut rows = Vec::with_capacity(result.len());
        let mut hidden_rows = 0;
        for (left, right) in result.rows() {
            let identical = matches!(
                (left.kind, right.kind),
                (LineKind::Identical, LineKind::Identical)
            );
            if changes_only && identical {
                hidden_rows += 1;
                continue;
            }
            rows.push(RowCtx {
                left: CellCtx::from(left),
                right: CellCtx::from(right),
            });
        }
        Self {
            title: title.into(),
            left_name: left_name.into(),
            right_name: right_name.into(),
            stats: StatsCtx::from(result.stats),
            rows,
            hidden_rows,
            in_report: false,
            generated_at: Utc::now(),
        }
    }

    /// Serialize into a [`tera::Context`].
    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        Ok(tera::Context::from_serialize(self)?)
    }
}

/// One host row on the summary page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostCtx {
    pub id: String,
    pub group: String,
    pub status: String,
    pub stats: Option<StatsCtx>,
    pub error: Option<String>,
    pub health: Option<TaskHealth>,
    pub error_delta: Option<i64>,
    /// File name of the diff page under `diffs/`, for completed tasks.
    pub page: Option<String>,
}

/// Context for `index.html.tera`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportContext {
    pub title: String,
    pub source: String,
    pub totals: StatsCtx,
    pub completed: usize,
    pub failed: usize,
    pub pending: usize,
    /// Completed tasks that contain at least one difference.
    pub different: usize,
    pub hosts: Vec<HostCtx>,
    pub orphans: Vec<String>,
    /// `summary_*.txt` files found at the source root.
    #[serde(default)]
    pub summaries: SourceSummaries,
    pub generated_at: DateTime<Utc>,
}

impl ReportContext {
    /// Build the summary from a finished (or partially finished) batch.
    ///
    /// `page_for` names a completed task's diff page under `diffs/`.
    pub fn from_tasks(
        source: impl Into<String>,
        tasks: &[ComparisonTask],
        totals: Stats,
        orphans: &[String],
        page_for: impl Fn(&ComparisonTask) -> String,
    ) -> Self {
        let count = |status: TaskStatus| tasks.iter().filter(|t| t.status == status).count();
        let hosts = tasks
            .iter()
            .map(|task| {
                let completed = task.status == TaskStatus::Completed;
                HostCtx {
                    id: task.id.to_string(),
                    group: task.group.clone().unwrap_or_else(|| "root".to_string()),
                    status: task.status.to_string(),
                    stats: task.stats().map(StatsCtx::from),
                    error: task.error.clone(),
                    health: task.health.clone(),
                    error_delta: task.health.as_ref().map(TaskHealth::error_delta),
                    page: completed.then(|| page_for(task)),
                }
            })
            .collect();
        Self {
            title: "Log comparison report".to_string(),
            source: source.into(),
            totals: StatsCtx::from(totals),
            completed: count(TaskStatus::Completed),
            failed: count(TaskStatus::Failed),
            pending: count(TaskStatus::Pending) + count(TaskStatus::Processing),
            different: tasks
                .iter()
                .filter_map(ComparisonTask::stats)
                .filter(Stats::has_differences)
                .count(),
            hosts,
            orphans: orphans.to_vec(),
            summaries: SourceSummaries::default(),
            generated_at: Utc::now(),
        }
    }

    pub fn with_summaries(mut self, summaries: SourceSummaries) -> Self {
        self.summaries = summaries;
        self
    }

    /// Serialize into a [`tera::Context`].
    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        Ok(tera::Context::from_serialize(self)?)
    }
}
