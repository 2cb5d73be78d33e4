//! Sequential batch orchestration and stats aggregation.
//!
//! ## Per-task protocol
//!
//! 1. Status → `Processing`, observer notified.
//! 2. Both sides loaded through the [`ContentLoader`], then compared.
//! 3. Success → `Completed` with the result attached.
//! 4. Load failure → `Failed` with the error message; no retry.
//! 5. Observer notified of the resolved task.
//!
//! Tasks run strictly one after another in input order. Content for a task is
//! dropped before the next task loads, so at most two sources are resident.

use std::sync::atomic::{AtomicBool, Ordering};

use logdiff_core::{
    config::ScanPatterns,
    types::{ComparisonTask, DiffResult, Stats, TaskHealth, TaskStatus},
    LoadError,
};

use crate::diff::compare_text;
use crate::loader::ContentLoader;
use crate::scan::scan;

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Resolved-over-total snapshot of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub resolved: usize,
    pub total: usize,
}

impl Progress {
    /// Fraction in `0.0..=1.0`. An empty batch counts as finished.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.resolved as f64 / self.total as f64
        }
    }

    pub fn percent(&self) -> u8 {
        (self.ratio() * 100.0).round() as u8
    }
}

/// Receives per-task transitions while a batch runs.
///
/// Both hooks default to no-ops.
pub trait ProgressObserver {
    /// Called right after `task` moved to `Processing`.
    fn on_start(&mut self, _index: usize, _task: &ComparisonTask, _progress: Progress) {}

    /// Called right after `task` moved to `Completed` or `Failed`.
    fn on_resolved(&mut self, _index: usize, _task: &ComparisonTask, _progress: Progress) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {}

// ---------------------------------------------------------------------------
// Batch
// ---------------------------------------------------------------------------

/// Outcome counts of one [`Batch::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub completed: usize,
    pub failed: usize,
    /// Tasks left `Pending` because the stop signal was raised.
    pub skipped: usize,
    pub stats: Stats,
}

/// Owned, ordered collection of comparison tasks.
///
/// The batch is the only writer of task state; nothing else mutates tasks
/// while a run is in progress.
#[derive(Debug, Default)]
pub struct Batch {
    tasks: Vec<ComparisonTask>,
    scan: Option<ScanPatterns>,
}

impl Batch {
    pub fn new(tasks: Vec<ComparisonTask>) -> Self {
        Self { tasks, scan: None }
    }

    /// Also record [`TaskHealth`] for every completed task.
    pub fn with_scan(mut self, patterns: ScanPatterns) -> Self {
        self.scan = Some(patterns);
        self
    }

    pub fn tasks(&self) -> &[ComparisonTask] {
        &self.tasks
    }

    pub fn into_tasks(self) -> Vec<ComparisonTask> {
        self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Current resolved-over-total snapshot.
    pub fn progress(&self) -> Progress {
        Progress {
            resolved: self.tasks.iter().filter(|t| t.status.is_resolved()).count(),
            total: self.tasks.len(),
        }
    }

    /// Field-wise sum of stats over every `Completed` task.
    ///
    /// `Pending`, `Processing` and `Failed` tasks are skipped, not counted as
    /// zero. Safe to call at any point of a run.
    pub fn aggregate(&self) -> Stats {
        self.tasks.iter().filter_map(ComparisonTask::stats).sum()
    }

    /// Run every task to completion.
    pub fn run<L, O>(&mut self, loader: &L, observer: &mut O) -> RunSummary
    where
        L: ContentLoader,
        O: ProgressObserver,
    {
        self.run_until(loader, observer, &AtomicBool::new(false))
    }

    /// Run tasks in order, checking `stop` before each one.
    ///
    /// A task that has started always finishes. Once `stop` is seen, the
    /// remaining tasks stay `Pending`.
    pub fn run_until<L, O>(&mut self, loader: &L, observer: &mut O, stop: &AtomicBool) -> RunSummary
    where
        L: ContentLoader,
        O: ProgressObserver,
    {
        tracing::info!("batch started: {} task(s)", self.tasks.len());
        let mut resolved = self.progress().resolved;
        let total = self.tasks.len();

        for index in 0..total {
            if self.tasks[index].status != TaskStatus::Pending {
                continue;
            }
            if stop.load(Ordering::SeqCst) {
                tracing::info!("stop requested; leaving remaining tasks pending");
                break;
            }

            self.tasks[index].status = TaskStatus::Processing;
            tracing::debug!("processing {}", self.tasks[index].id);
            observer.on_start(index, &self.tasks[index], Progress { resolved, total });

            let outcome = execute(loader, &self.tasks[index], self.scan.as_ref());
            let task = &mut self.tasks[index];
            match outcome {
                Ok((result, health)) => {
                    tracing::debug!("completed {}: {} difference(s)", task.id, result.stats.total);
                    task.result = Some(result);
                    task.health = health;
                    task.status = TaskStatus::Completed;
                }
                Err(err) => {
                    tracing::warn!("failed {}: {err}", task.id);
                    task.error = Some(err.to_string());
                    task.status = TaskStatus::Failed;
                }
            }
            resolved += 1;
            observer.on_resolved(index, &self.tasks[index], Progress { resolved, total });
        }

        let summary = self.summary();
        tracing::info!(
            "batch finished: {} completed, {} failed, {} pending",
            summary.completed,
            summary.failed,
            summary.skipped
        );
        summary
    }

    fn summary(&self) -> RunSummary {
        let count = |status: TaskStatus| self.tasks.iter().filter(|t| t.status == status).count();
        RunSummary {
            completed: count(TaskStatus::Completed),
            failed: count(TaskStatus::Failed),
            skipped: count(TaskStatus::Pending),
            stats: self.aggregate(),
        }
    }
}

fn execute<L: ContentLoader>(
    loader: &L,
    task: &ComparisonTask,
    patterns: Option<&ScanPatterns>,
) -> Result<(DiffResult, Option<TaskHealth>), LoadError> {
    let pre = loader.load(&task.left)?;
    let post = loader.load(&task.right)?;
    let health = patterns.map(|p| TaskHealth {
        pre: scan(&pre, p),
        post: scan(&post, p),
    });
    Ok((compare_text(&pre, &post), health))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
