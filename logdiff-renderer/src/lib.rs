//! # logdiff-renderer
//!
//! Tera-based HTML reports plus JSON and CSV summaries for finished
//! comparison batches.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use logdiff_core::{ComparisonTask, ReportFormat, Stats};
//! use logdiff_renderer::{write_report, ReportInput, TemplateEngine};
//!
//! fn publish(tasks: &[ComparisonTask], aggregate: Stats) {
//!     let input = ReportInput {
//!         source: Path::new("logs"),
//!         tasks,
//!         aggregate,
//!         orphans: &[],
//!     };
//!     if let Ok(engine) = TemplateEngine::new() {
//!         let _ = write_report(Path::new("report"), &input, ReportFormat::Html, false, &engine);
//!     }
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;
pub mod report;
pub mod summary;

pub use context::{DiffPageContext, ReportContext};
pub use engine::{Page, TemplateEngine};
pub use error::RenderError;
pub use report::{write_csv, write_html, write_json, write_report, JsonReport, ReportInput};
pub use summary::{parse_summary, SourceSummaries, SummaryEntry};
