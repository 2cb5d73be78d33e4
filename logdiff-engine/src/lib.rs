//! # logdiff-engine
//!
//! Line diff engine and sequential batch orchestration.
//!
//! Call [`compare`] to align two line sequences, or build a [`Batch`] from
//! [`pair_directory`] and [`Batch::run`] it with a [`ContentLoader`].

pub mod batch;
pub mod diff;
pub mod error;
pub mod loader;
pub mod pairing;
pub mod scan;

pub use batch::{Batch, NoProgress, Progress, ProgressObserver, RunSummary};
pub use diff::{compare, compare_text, split_lines};
pub use error::EngineError;
pub use loader::{load_and_compare, ContentLoader, FsLoader, MemoryLoader};
pub use pairing::{pair_directory, Pairing};
