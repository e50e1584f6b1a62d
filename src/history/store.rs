use std::collections::BTreeMap;

use super::DayKey;
use crate::problems::CandidateKey;

/// Day-bucketed record of the candidate keys already served for one problem
/// type. Buckets keep insertion order; the `BTreeMap` keeps days in
/// chronological order so the oldest bucket is always the first entry.
#[derive(Debug, Default)]
pub struct HistoryStore {
    buckets: BTreeMap<DayKey, Vec<CandidateKey>>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Duplicate check across every day, not just the current one.
    pub fn contains(&self, key: &CandidateKey) -> bool {
        self.buckets.values().any(|bucket| bucket.contains(key))
    }

    /// Appends without checking for duplicates; callers run `contains` first.
    pub fn insert(&mut self, day: DayKey, key: CandidateKey) {
        self.buckets.entry(day).or_default().push(key);
    }

    pub fn total_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_count() == 0
    }

    pub fn oldest_non_empty_day(&self) -> Option<DayKey> {
        self.buckets
            .iter()
            .find(|(_, bucket)| !bucket.is_empty())
            .map(|(day, _)| *day)
    }

    /// Removes the oldest-inserted entry of the chronologically oldest
    /// non-empty bucket, pruning the bucket once it empties.
    pub fn pop_oldest(&mut self) -> Option<(DayKey, CandidateKey)> {
        let day = self.oldest_non_empty_day()?;
        let bucket = self.buckets.get_mut(&day)?;
        let key = bucket.remove(0);
        if bucket.is_empty() {
            self.buckets.remove(&day);
        }
        Some((day, key))
    }

    /// Deletes an entire day bucket, returning how many entries it held.
    pub fn prune_day(&mut self, day: DayKey) -> usize {
        self.buckets.remove(&day).map(|bucket| bucket.len()).unwrap_or(0)
    }

    pub fn days(&self) -> impl Iterator<Item = (DayKey, usize)> + '_ {
        self.buckets.iter().map(|(day, bucket)| (*day, bucket.len()))
    }
}
