//! logdiff core library: domain types, configuration, errors.
//!
//! - [`types`]: line records, stats, diff results and batch tasks
//! - [`error`]: [`LoadError`] and [`ConfigError`]
//! - [`config`]: YAML configuration with defaults

pub mod config;
pub mod error;
pub mod types;

pub use config::{Config, PairingConfig, ReportFormat, ScanConfig};
pub use error::{ConfigError, LoadError};
pub use types::{
    ComparisonTask, DiffResult, LineKind, LineRecord, LogHealth, Stats, TaskHealth, TaskId,
    TaskStatus,
};
