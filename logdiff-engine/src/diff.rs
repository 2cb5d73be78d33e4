//! Line alignment and classification.
//!
//! ## `compare`: single forward pass
//!
//! Two cursors `i` (left) and `j` (right), one line of lookahead:
//!
//! 1. Left exhausted → `right[j]` is added.
//! 2. Right exhausted → `left[i]` is deleted.
//! 3. `left[i] == right[j]` → identical.
//! 4. Mismatch:
//!    a. `left[i + 1] == right[j]` → `left[i]` is deleted.
//!    b. `left[i] == right[j + 1]` → `right[j]` is added.
//!    c. otherwise a changed pair.
//!
//! Not an optimal alignment: multi-line insertions, deletions and moved
//! blocks come out as runs of changed pairs.

use logdiff_core::types::{DiffResult, LineKind, LineRecord, Stats};

/// Align `left` against `right`.
///
/// Total over any two finite sequences, deterministic, no side effects.
pub fn compare<S: AsRef<str>>(left: &[S], right: &[S]) -> DiffResult {
    let mut out = Aligner::with_capacity(left.len().max(right.len()));
    let (mut i, mut j) = (0, 0);

    while i < left.len() || j < right.len() {
        if i >= left.len() {
            out.added(right[j].as_ref());
            j += 1;
        } else if j >= right.len() {
            out.deleted(left[i].as_ref());
            i += 1;
        } else {
            let pre = left[i].as_ref();
            let post = right[j].as_ref();
            if pre == post {
                out.identical(pre, post);
                i += 1;
                j += 1;
            } else if line_at(left, i + 1) == Some(post) {
                out.deleted(pre);
                i += 1;
            } else if line_at(right, j + 1) == Some(pre) {
                out.added(post);
                j += 1;
            } else {
                out.changed(pre, post);
                i += 1;
                j += 1;
            }
        }
    }

    out.finish()
}

/// Split decoded content into lines.
///
/// `\r\n` is normalised to `\n` first, so a CRLF capture compares identical
/// to its LF copy instead of every line differing by a trailing `\r`. A
/// trailing line break yields a trailing empty line, and empty content yields
/// a single empty line.
pub fn split_lines(content: &str) -> Vec<String> {
    normalize_line_endings(content)
        .split('\n')
        .map(str::to_owned)
        .collect()
}

/// [`compare`] over two unsplit texts.
pub fn compare_text(left: &str, right: &str) -> DiffResult {
    compare(&split_lines(left), &split_lines(right))
}

fn line_at<S: AsRef<str>>(lines: &[S], idx: usize) -> Option<&str> {
    lines.get(idx).map(|s| s.as_ref())
}

fn normalize_line_endings(content: &str) -> String {
    content.replace("\r\n", "\n")
}

/// Accumulates aligned rows and per-side line numbers.
struct Aligner {
    left: Vec<LineRecord>,
    right: Vec<LineRecord>,
    stats: Stats,
    left_no: usize,
    right_no: usize,
}

impl Aligner {
    fn with_capacity(rows: usize) -> Self {
        Self {
            left: Vec::with_capacity(rows),
            right: Vec::with_capacity(rows),
            stats: Stats::default(),
            left_no: 0,
            right_no: 0,
        }
    }

    fn next_left(&mut self) -> usize {
        self.left_no += 1;
        self.left_no
    }

    fn next_right(&mut self) -> usize {
        self.right_no += 1;
        self.right_no
    }

    fn identical(&mut self, pre: &str, post: &str) {
        let (l, r) = (self.next_left(), self.next_right());
        self.left.push(LineRecord::new(LineKind::Identical, pre, l));
        self.right.push(LineRecord::new(LineKind::Identical, post, r));
    }

    fn added(&mut self, post: &str) {
        let r = self.next_right();
        self.left.push(LineRecord::empty());
        self.right.push(LineRecord::new(LineKind::Added, post, r));
        self.stats.record_added();
    }

    fn deleted(&mut self, pre: &str) {
        let l = self.next_left();
        self.left.push(LineRecord::new(LineKind::Deleted, pre, l));
        self.right.push(LineRecord::empty());
        self.stats.record_deleted();
    }

    fn changed(&mut self, pre: &str, post: &str) {
        let (l, r) = (self.next_left(), self.next_right());
        self.left.push(LineRecord::new(LineKind::Changed, pre, l));
        self.right.push(LineRecord::new(LineKind::Changed, post, r));
        self.stats.record_changed();
    }

    fn finish(self) -> DiffResult {
        debug_assert_eq!(self.left.len(), self.right.len());
        DiffResult {
            left: self.left,
            right: self.right,
            stats: self.stats,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
