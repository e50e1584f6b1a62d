//! Property-Based Tests for the problem-history engine
//!
//! Tests the following invariants:
//! - Global uniqueness: a candidate is never admitted twice for one type,
//!   regardless of which days the admissions land on
//! - Turnover bound: enforce_turnover never leaves more than `limit` entries
//!   and never evicts more than necessary
//! - Oldest-first eviction: survivors are always the most recently admitted
//! - Cleanup idempotence: a second sweep with the same date removes nothing

use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use serde_json::json;

use mathdrill_backend_rust::history::ProblemHistory;
use mathdrill_backend_rust::problems::CandidateKey;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn day(offset: u64) -> NaiveDate {
    base_date().checked_add_days(Days::new(offset)).unwrap()
}

fn key(value: i64) -> CandidateKey {
    CandidateKey::from_value(&json!([value]))
}

// ============================================================================
// Strategies
// ============================================================================

/// A sequence of (candidate id, day offset) admission attempts, with repeats
/// likely because candidate ids come from a small range.
fn arb_admissions() -> impl Strategy<Value = Vec<(i64, u64)>> {
    proptest::collection::vec(((0i64..20i64), (0u64..30u64)), 1..60)
}

fn arb_distinct_inserts() -> impl Strategy<Value = Vec<(i64, u64)>> {
    proptest::collection::vec((0u64..30u64), 1..40).prop_map(|offsets| {
        offsets
            .into_iter()
            .enumerate()
            .map(|(i, offset)| (i as i64, offset))
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_global_uniqueness(admissions in arb_admissions()) {
        let history = ProblemHistory::new();
        let mut admitted: Vec<i64> = Vec::new();

        for (candidate, offset) in admissions {
            if history.try_admit("t", &key(candidate), day(offset)) {
                admitted.push(candidate);
            }
        }

        let mut deduped = admitted.clone();
        deduped.sort_unstable();
        deduped.dedup();
        prop_assert_eq!(deduped.len(), admitted.len());
    }

    #[test]
    fn prop_turnover_bound_without_over_eviction(
        inserts in arb_distinct_inserts(),
        limit in 0usize..50usize,
    ) {
        let history = ProblemHistory::new();
        for (candidate, offset) in &inserts {
            prop_assert!(history.try_admit("t", &key(*candidate), day(*offset)));
        }

        let evicted = history.enforce_turnover("t", limit);
        prop_assert_eq!(evicted, inserts.len().saturating_sub(limit));
        prop_assert_eq!(history.total_count("t"), inserts.len().min(limit));
    }

    #[test]
    fn prop_oldest_first_eviction(count in 1usize..20usize, limit in 0usize..20usize) {
        let history = ProblemHistory::new();
        // One candidate per day, days strictly ascending.
        for i in 0..count {
            prop_assert!(history.try_admit("t", &key(i as i64), day(i as u64)));
        }

        history.enforce_turnover("t", limit);

        let surviving = count.min(limit);
        for i in 0..count {
            let expected = i >= count - surviving;
            prop_assert_eq!(history.contains("t", &key(i as i64)), expected);
        }
    }

    #[test]
    fn prop_cleanup_is_idempotent(
        inserts in arb_distinct_inserts(),
        horizon_offset in 0u64..60u64,
        max_age in 0i64..40i64,
    ) {
        let history = ProblemHistory::new();
        for (candidate, offset) in &inserts {
            history.try_admit("t", &key(*candidate), day(*offset));
        }

        let today = day(horizon_offset);
        history.cleanup(today, max_age);
        let after_first = serde_json::to_value(history.stats()).unwrap();

        let removed_again = history.cleanup(today, max_age);
        let after_second = serde_json::to_value(history.stats()).unwrap();

        prop_assert_eq!(removed_again, 0);
        prop_assert_eq!(after_first, after_second);
    }

    #[test]
    fn prop_cleanup_respects_horizon(
        inserts in arb_distinct_inserts(),
        max_age in 0i64..40i64,
    ) {
        let history = ProblemHistory::new();
        for (candidate, offset) in &inserts {
            history.try_admit("t", &key(*candidate), day(*offset));
        }

        let today = day(45);
        history.cleanup(today, max_age);

        for (candidate, offset) in &inserts {
            let age = (today - day(*offset)).num_days();
            prop_assert_eq!(history.contains("t", &key(*candidate)), age <= max_age);
        }
    }
}
