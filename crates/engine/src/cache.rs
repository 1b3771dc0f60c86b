//! Bounded FIFO cache of recent analysis results.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use framesight_frame_model::AnalysisResult;
use serde::{Deserialize, Serialize};

/// One cached analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    pub result: AnalysisResult,
    pub inserted_at: DateTime<Utc>,
}

/// Fixed-capacity result cache with insertion-order eviction.
///
/// Lookups do not refresh an entry's position. Every method takes the
/// lock for the duration of the call only, so the cache is safe to share
/// between tasks and the lock is never held across an await.
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: Mutex<VecDeque<CacheEntry>>,
}

impl ResultCache {
    pub const CAPACITY: usize = 20;

    pub fn new() -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(Self::CAPACITY)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<CacheEntry>> {
        // Entries are replaced whole, so a poisoned lock still holds a valid queue.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, key: &str) -> Option<AnalysisResult> {
        self.lock()
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.result.clone())
    }

    /// Insert a result under `key`.
    ///
    /// An existing entry with the same key is removed first, so the new
    /// entry is the most recent insertion. Returns the evicted entry when
    /// the cache was full.
    pub fn insert(&self, key: impl Into<String>, result: AnalysisResult) -> Option<CacheEntry> {
        let key = key.into();
        let mut entries = self.lock();

        entries.retain(|entry| entry.key != key);

        let evicted = if entries.len() >= Self::CAPACITY {
            entries.pop_front()
        } else {
            None
        };
        if let Some(old) = &evicted {
            tracing::debug!(key = %old.key, "Evicted oldest cache entry");
        }

        entries.push_back(CacheEntry {
            key,
            result,
            inserted_at: Utc::now(),
        });

        evicted
    }

    /// Attach insight text and recommendations to an existing entry in
    /// place. Returns false when the key is no longer cached.
    pub fn attach_insight(
        &self,
        key: &str,
        insight: Option<String>,
        recommendations: Vec<framesight_frame_model::Recommendation>,
    ) -> bool {
        let mut entries = self.lock();
        match entries.iter_mut().find(|entry| entry.key == key) {
            Some(entry) => {
                entry.result.insight = insight;
                entry.result.recommendations = recommendations;
                true
            }
            None => false,
        }
    }

    /// Snapshot of all entries, oldest first.
    pub fn entries(&self) -> Vec<CacheEntry> {
        self.lock().iter().cloned().collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        Self::CAPACITY
    }
}
