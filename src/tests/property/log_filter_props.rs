//! Property-based tests for the log feed
//!
//! Tests invariants:
//! - A level filter yields only entries of that level
//! - No filter yields the whole buffer
//! - Filtering preserves order
//! - Cycling the filter six times returns to the start
//! - Growth raises the scroll signal only while following

use proptest::prelude::*;

use crate::core::api::{LogEntry, LogLevel};
use crate::core::polling::{filter_entries, LogFeed};
use crate::tests::common::log_entry;

// ============================================================================
// Strategies
// ============================================================================

fn arb_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Error),
        Just(LogLevel::Warn),
        Just(LogLevel::Info),
        Just(LogLevel::Debug),
        Just(LogLevel::Trace),
        "[A-Z]{4,6}".prop_map(LogLevel::from),
    ]
}

fn arb_entries() -> impl Strategy<Value = Vec<LogEntry>> {
    prop::collection::vec(arb_level(), 0..80).prop_map(|levels| {
        levels
            .into_iter()
            .enumerate()
            .map(|(i, level)| log_entry(level, &format!("line {i}")))
            .collect()
    })
}

proptest! {
    /// Property: filtered entries all carry the selected level
    #[test]
    fn prop_filter_only_matching_level(entries in arb_entries(), level in arb_level()) {
        let filtered = filter_entries(&entries, Some(&level));
        prop_assert!(filtered.iter().all(|e| e.level == level));
        prop_assert_eq!(
            filtered.len(),
            entries.iter().filter(|e| e.level == level).count()
        );
    }

    /// Property: no filter is the identity
    #[test]
    fn prop_no_filter_keeps_all(entries in arb_entries()) {
        prop_assert_eq!(filter_entries(&entries, None), entries);
    }

    /// Property: filtering keeps the backend order
    #[test]
    fn prop_filter_preserves_order(entries in arb_entries(), level in arb_level()) {
        let expected: Vec<String> = entries
            .iter()
            .filter(|e| e.level == level)
            .map(|e| e.message.clone())
            .collect();
        let actual: Vec<String> = filter_entries(&entries, Some(&level))
            .into_iter()
            .map(|e| e.message)
            .collect();
        prop_assert_eq!(actual, expected);
    }

    /// Property: the filter cycle has period six (All plus five levels)
    #[test]
    fn prop_filter_cycle_period(entries in arb_entries(), start in 0usize..6) {
        let mut feed = LogFeed::new(None, true);
        feed.replace(entries);
        for _ in 0..start {
            feed.cycle_filter();
        }
        let before = feed.filter().cloned();
        for _ in 0..6 {
            feed.cycle_filter();
        }
        prop_assert_eq!(feed.filter().cloned(), before);
    }

    /// Property: growth signals a scroll only in follow mode
    #[test]
    fn prop_scroll_signal_requires_follow(
        first in 0usize..40,
        extra in 0usize..40,
        follow in any::<bool>(),
    ) {
        let lines = |n: usize| -> Vec<LogEntry> {
            (0..n).map(|i| log_entry(LogLevel::Info, &format!("line {i}"))).collect()
        };
        let mut feed = LogFeed::new(None, follow);
        feed.replace(lines(first));
        feed.take_scroll_signal();

        let raised = feed.replace(lines(first + extra));
        prop_assert_eq!(raised, follow && extra > 0);
        prop_assert_eq!(feed.take_scroll_signal(), raised);
        prop_assert!(!feed.take_scroll_signal());
    }
}
