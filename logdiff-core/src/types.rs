//! Domain types for line comparison and batch runs.
//!
//! All source handles use `PathBuf`; the loader decides how to resolve them.
//! All types are serializable via serde so results can be emitted as JSON.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Key shared by the two sources of one comparison (usually a host address).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(pub String);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Line classification
// ---------------------------------------------------------------------------

/// Classification of one side of one aligned row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Identical,
    Added,
    Deleted,
    Changed,
    /// Placeholder on the side that has no content for this row.
    Empty,
}

impl LineKind {
    /// Stable lowercase key, also used as the CSS class in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            LineKind::Identical => "identical",
            LineKind::Added => "added",
            LineKind::Deleted => "deleted",
            LineKind::Changed => "changed",
            LineKind::Empty => "empty",
        }
    }
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One side of one aligned row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRecord {
    pub kind: LineKind,
    pub text: String,
    /// 1-based line number within this side. `None` for [`LineKind::Empty`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<usize>,
}

impl LineRecord {
    /// A numbered record carrying `text`.
    pub fn new(kind: LineKind, text: impl Into<String>, number: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            number: Some(number),
        }
    }

    /// The padding record emitted opposite an added or deleted line.
    pub fn empty() -> Self {
        Self {
            kind: LineKind::Empty,
            text: String::new(),
            number: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.kind == LineKind::Empty
    }
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Counts of non-identical rows. `total == added + deleted + changed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total: usize,
    pub added: usize,
    pub deleted: usize,
    pub changed: usize,
}

impl Stats {
    pub fn record_added(&mut self) {
        self.added += 1;
        self.total += 1;
    }

    pub fn record_deleted(&mut self) {
        self.deleted += 1;
        self.total += 1;
    }

    pub fn record_changed(&mut self) {
        self.changed += 1;
        self.total += 1;
    }

    pub fn has_differences(&self) -> bool {
        self.total > 0
    }
}

impl Add for Stats {
    type Output = Stats;

    fn add(mut self, rhs: Stats) -> Stats {
        self += rhs;
        self
    }
}

impl AddAssign for Stats {
    fn add_assign(&mut self, rhs: Stats) {
        self.total += rhs.total;
        self.added += rhs.added;
        self.deleted += rhs.deleted;
        self.changed += rhs.changed;
    }
}

impl Sum for Stats {
    fn sum<I: Iterator<Item = Stats>>(iter: I) -> Stats {
        iter.fold(Stats::default(), Add::add)
    }
}

impl<'a> Sum<&'a Stats> for Stats {
    fn sum<I: Iterator<Item = &'a Stats>>(iter: I) -> Stats {
        iter.copied().sum()
    }
}

// ---------------------------------------------------------------------------
// DiffResult
// ---------------------------------------------------------------------------

/// Two aligned, equal-length row sequences plus their stats.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffResult {
    pub left: Vec<LineRecord>,
    pub right: Vec<LineRecord>,
    pub stats: Stats,
}

impl DiffResult {
    /// Number of aligned rows.
    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Iterate rows as `(left, right)` pairs.
    pub fn rows(&self) -> impl Iterator<Item = (&LineRecord, &LineRecord)> {
        self.left.iter().zip(self.right.iter())
    }
}

// ---------------------------------------------------------------------------
// Log health
// ---------------------------------------------------------------------------

/// Error and command counts found in one side's content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogHealth {
    pub errors: usize,
    pub invalid: usize,
    /// Trimmed command lines, in order of appearance.
    #[serde(default)]
    pub commands: Vec<String>,
}

/// [`LogHealth`] for both sides of a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskHealth {
    pub pre: LogHealth,
    pub post: LogHealth,
}

impl TaskHealth {
    /// Change in error count from pre to post.
    pub fn error_delta(&self) -> i64 {
        self.post.errors as i64 - self.pre.errors as i64
    }
}

// ---------------------------------------------------------------------------
// Batch tasks
// ---------------------------------------------------------------------------

/// Lifecycle of a [`ComparisonTask`]:
/// `Pending → Processing → (Completed | Failed)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Failed,
}

impl TaskStatus {
    /// `true` once the task can no longer change.
    pub fn is_resolved(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::Processing => write!(f, "processing"),
            TaskStatus::Completed => write!(f, "completed"),
            TaskStatus::Failed => write!(f, "failed"),
        }
    }
}

/// One pre/post pair to compare.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonTask {
    pub id: TaskId,
    pub left: PathBuf,
    pub right: PathBuf,
    /// Folder of the pair relative to the scanned root; `None` at the root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<DiffResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<TaskHealth>,
}

impl ComparisonTask {
    /// A fresh task in [`TaskStatus::Pending`].
    pub fn new(id: impl Into<TaskId>, left: impl Into<PathBuf>, right: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            left: left.into(),
            right: right.into(),
            group: None,
            status: TaskStatus::Pending,
            result: None,
            error: None,
            health: None,
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Stats of the attached result, if the task completed.
    pub fn stats(&self) -> Option<Stats> {
        match self.status {
            TaskStatus::Completed => self.result.as_ref().map(|r| r.stats),
            TaskStatus::Pending | TaskStatus::Processing | TaskStatus::Failed => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
