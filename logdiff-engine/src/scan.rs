//! Log health scan: error, invalid-token and command line counts.
//!
//! Runs over raw content and never influences diff classification.

use logdiff_core::{config::ScanPatterns, LogHealth};

/// Scan `content` line by line.
pub fn scan(content: &str, patterns: &ScanPatterns) -> LogHealth {
    let mut health = LogHealth::default();
    for line in content.lines() {
        if patterns.error.is_match(line) {
            health.errors += 1;
        }
        if patterns.invalid.is_match(line) {
            health.invalid += 1;
        }
        let trimmed = line.trim();
        if patterns.command.is_match(trimmed) {
            health.commands.push(trimmed.to_string());
        }
    }
    health
}
