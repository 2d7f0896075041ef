//! Cache Statistics Module
//!
//! Tracks view cache hits, misses and stores.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of view cache performance metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of lookups answered from the cache
    pub hits: u64,
    /// Number of lookups that found nothing
    pub misses: u64,
    /// Number of writes, including replacements
    pub stores: u64,
    /// Current number of cached views
    pub total_entries: usize,
}

impl CacheStats {
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
