mod day_key;
mod store;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;

pub use day_key::DayKey;
pub use store::HistoryStore;

use crate::problems::CandidateKey;

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("invalid day key: {0:?} (expected 8-digit YYYYMMDD)")]
    InvalidDayKey(String),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayStats {
    pub day: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeHistoryStats {
    pub type_id: String,
    pub total_count: usize,
    pub days: Vec<DayStats>,
}

/// Served-problem history across all problem types.
///
/// Each type's bucket map sits behind its own mutex so admissions for
/// different types never contend; the admission check-then-insert is atomic
/// with respect to other callers for the same type. The instance is owned by
/// the host and injected wherever it is needed; there is no global state.
#[derive(Default)]
pub struct ProblemHistory {
    types: RwLock<HashMap<String, Arc<Mutex<HistoryStore>>>>,
}

impl ProblemHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotently creates the (empty) store for a type and hands back its
    /// lock handle.
    fn ensure(&self, type_id: &str) -> Arc<Mutex<HistoryStore>> {
        if let Some(store) = self.types.read().get(type_id) {
            return Arc::clone(store);
        }

        let mut types = self.types.write();
        Arc::clone(types.entry(type_id.to_string()).or_default())
    }

    /// Admits `key` iff no structurally-equal key exists anywhere in the
    /// type's history, recording it under `today`'s bucket. Check and insert
    /// happen under the type lock, so two concurrent admissions of equal keys
    /// cannot both succeed.
    pub fn try_admit(&self, type_id: &str, key: &CandidateKey, today: NaiveDate) -> bool {
        let store = self.ensure(type_id);
        let mut store = store.lock();

        if store.contains(key) {
            return false;
        }
        store.insert(DayKey::from_date(today), key.clone());
        true
    }

    pub fn contains(&self, type_id: &str, key: &CandidateKey) -> bool {
        match self.types.read().get(type_id) {
            Some(store) => store.lock().contains(key),
            None => false,
        }
    }

    /// Evicts oldest entries until the type holds at most `limit` keys.
    /// Returns how many were evicted; a no-op at or below the limit.
    pub fn enforce_turnover(&self, type_id: &str, limit: usize) -> usize {
        let Some(store) = self.types.read().get(type_id).map(Arc::clone) else {
            return 0;
        };

        let mut store = store.lock();
        let mut evicted = 0;
        while store.total_count() > limit {
            if store.pop_oldest().is_none() {
                break;
            }
            evicted += 1;
        }
        evicted
    }

    pub fn total_count(&self, type_id: &str) -> usize {
        match self.types.read().get(type_id) {
            Some(store) => store.lock().total_count(),
            None => 0,
        }
    }

    /// Purges every day bucket older than `max_age_days` whole days across
    /// all types. Idempotent; takes each type's lock only while sweeping it.
    pub fn cleanup(&self, today: NaiveDate, max_age_days: i64) -> usize {
        let handles: Vec<(String, Arc<Mutex<HistoryStore>>)> = self
            .types
            .read()
            .iter()
            .map(|(id, store)| (id.clone(), Arc::clone(store)))
            .collect();

        let mut removed = 0;
        for (type_id, store) in handles {
            let mut store = store.lock();
            let stale: Vec<DayKey> = store
                .days()
                .filter(|(day, _)| day.age_days(today) > max_age_days)
                .map(|(day, _)| day)
                .collect();

            for day in stale {
                let count = store.prune_day(day);
                tracing::debug!(type_id = %type_id, day = %day, count, "pruned stale history bucket");
                removed += count;
            }
        }
        removed
    }

    pub fn type_stats(&self, type_id: &str) -> TypeHistoryStats {
        let (total_count, days) = match self.types.read().get(type_id) {
            Some(store) => {
                let store = store.lock();
                (
                    store.total_count(),
                    store
                        .days()
                        .map(|(day, count)| DayStats {
                            day: day.to_string(),
                            count,
                        })
                        .collect(),
                )
            }
            None => (0, Vec::new()),
        };

        TypeHistoryStats {
            type_id: type_id.to_string(),
            total_count,
            days,
        }
    }

    pub fn stats(&self) -> Vec<TypeHistoryStats> {
        let mut type_ids: Vec<String> = self.types.read().keys().cloned().collect();
        type_ids.sort();
        type_ids.iter().map(|id| self.type_stats(id)).collect()
    }
}
