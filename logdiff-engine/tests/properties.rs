//! Properties of `compare` that hold for every input.

use logdiff_core::{LineKind, Stats};
use logdiff_engine::compare;
use proptest::prelude::*;

fn lines() -> impl Strategy<Value = Vec<String>> {
    // Small alphabet so equal lines (and lookahead hits) are common.
    prop::collection::vec("[abc]{0,2}", 0..24)
}

proptest! {
    #[test]
    fn sides_have_equal_length(left in lines(), right in lines()) {
        let result = compare(&left, &right);
        prop_assert_eq!(result.left.len(), result.right.len());
    }

    #[test]
    fn total_is_sum_of_parts(left in lines(), right in lines()) {
        let s = compare(&left, &right).stats;
        prop_assert_eq!(s.total, s.added + s.deleted + s.changed);
    }

    #[test]
    fn comparing_with_itself_is_all_identical(x in lines()) {
        let result = compare(&x, &x);
        prop_assert_eq!(result.len(), x.len());
        prop_assert_eq!(result.stats, Stats::default());
        let all_identical = result
            .rows()
            .all(|(l, r)| l.kind == LineKind::Identical && r.kind == LineKind::Identical);
        prop_assert!(all_identical);
    }

    #[test]
    fn every_input_line_appears_once_in_order(left in lines(), right in lines()) {
        let result = compare(&left, &right);
        let pre: Vec<&str> = result
            .left
            .iter()
            .filter(|r| !r.is_empty())
            .map(|r| r.text.as_str())
            .collect();
        let post: Vec<&str> = result
            .right
            .iter()
            .filter(|r| !r.is_empty())
            .map(|r| r.text.as_str())
            .collect();
        prop_assert_eq!(pre, left.iter().map(String::as_str).collect::<Vec<_>>());
        prop_assert_eq!(post, right.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn numbers_are_consecutive_per_side(left in lines(), right in lines()) {
        let result = compare(&left, &right);
        let pre: Vec<usize> = result.left.iter().filter_map(|r| r.number).collect();
        let post: Vec<usize> = result.right.iter().filter_map(|r| r.number).collect();
        prop_assert_eq!(pre, (1..=left.len()).collect::<Vec<_>>());
        prop_assert_eq!(post, (1..=right.len()).collect::<Vec<_>>());
    }

    #[test]
    fn stats_match_row_kinds(left in lines(), right in lines()) {
        let result = compare(&left, &right);
        let count = |kind: LineKind| {
            result.rows().filter(|(l, r)| l.kind == kind || r.kind == kind).count()
        };
        prop_assert_eq!(result.stats.added, count(LineKind::Added));
        prop_assert_eq!(result.stats.deleted, count(LineKind::Deleted));
        prop_assert_eq!(result.stats.changed, count(LineKind::Changed));
    }
}
