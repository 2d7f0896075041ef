//! View Cache Module
//!
//! Unbounded, thread-safe map from a key to a resolved view. Writes replace,
//! last write wins. There is no eviction.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::view::{CacheStats, View};

// == Cached View ==
/// A cached view together with when it was resolved.
#[derive(Debug, Clone)]
pub struct CachedView {
    pub view: Arc<dyn View>,
    pub resolved_at: DateTime<Utc>,
}

// == View Cache ==
/// Concurrent view cache with hit/miss accounting.
#[derive(Debug, Default)]
pub struct ViewCache {
    entries: RwLock<HashMap<String, CachedView>>,
    hits: AtomicU64,
    misses: AtomicU64,
    stores: AtomicU64,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    // == Get ==
    /// Returns the cached view for `key`, recording a hit or a miss.
    pub fn get(&self, key: &str) -> Option<Arc<dyn View>> {
        let found = self
            .entries
            .read()
            .get(key)
            .map(|entry| Arc::clone(&entry.view));

        match found {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        found
    }

    // == Contains ==
    /// Checks for `key` without touching the statistics.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    // == Put ==
    /// Stores `view` under `key`, replacing any previous entry.
    pub fn put(&self, key: impl Into<String>, view: Arc<dyn View>) {
        let entry = CachedView {
            view,
            resolved_at: Utc::now(),
        };
        self.entries.write().insert(key.into(), entry);
        self.stores.fetch_add(1, Ordering::Relaxed);
    }

    // == Remove ==
    /// Removes one entry. Returns whether it was present.
    pub fn remove(&self, key: &str) -> bool {
        self.entries.write().remove(key).is_some()
    }

    // == Clear ==
    /// Drops every entry and returns how many there were. Statistics are kept.
    pub fn clear(&self) -> usize {
        let mut entries = self.entries.write();
        let removed = entries.len();
        entries.clear();
        removed
    }

    /// Returns a copy of every entry, sorted by key.
    pub fn entries(&self) -> Vec<(String, CachedView)> {
        let mut entries: Vec<_> = self
            .entries
            .read()
            .iter()
            .map(|(key, entry)| (key.clone(), entry.clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            stores: self.stores.load(Ordering::Relaxed),
            total_entries: self.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
