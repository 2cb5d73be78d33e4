//! Capture-run summaries dropped next to the logs.
//!
//! Collection tools may write `summary_preCheck.txt` and
//! `summary_postCheck.txt` at the source root, one `key: value` pair per
//! line. Both are optional; they are shown verbatim on the report index.

use std::path::Path;

use serde::{Deserialize, Serialize};

pub const PRE_SUMMARY_FILE: &str = "summary_preCheck.txt";
pub const POST_SUMMARY_FILE: &str = "summary_postCheck.txt";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub key: String,
    pub value: String,
}

/// The pre and post summary files of a source directory, if present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSummaries {
    pub pre: Option<Vec<SummaryEntry>>,
    pub post: Option<Vec<SummaryEntry>>,
}

impl SourceSummaries {
    pub fn load(source: &Path) -> Self {
        Self {
            pre: read_summary(&source.join(PRE_SUMMARY_FILE)),
            post: read_summary(&source.join(POST_SUMMARY_FILE)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pre.is_none() && self.post.is_none()
    }
}

/// Parse `key: value` lines.
///
/// Lines without a colon are skipped, leading `-` list markers are dropped
/// from keys, and a repeated key keeps its first position with the last value.
pub fn parse_summary(text: &str) -> Vec<SummaryEntry> {
    let mut entries: Vec<SummaryEntry> = Vec::new();
    for line in text.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().trim_start_matches(['-', ' ']).trim();
        if key.is_empty() {
            continue;
        }
        let value = value.trim().to_string();
        match entries.iter_mut().find(|e| e.key == key) {
            Some(existing) => existing.value = value,
            None => entries.push(SummaryEntry {
                key: key.to_string(),
                value,
            }),
        }
    }
    entries
}

fn read_summary(path: &Path) -> Option<Vec<SummaryEntry>> {
    if !path.is_file() {
        return None;
    }
    match std::fs::read(path) {
        Ok(bytes) => Some(parse_summary(&String::from_utf8_lossy(&bytes))),
        Err(e) => {
            tracing::warn!("cannot read summary {}: {e}", path.display());
            None
        }
    }
}
