//! Response DTOs for the view server API
//!
//! Defines the structure of outgoing JSON response bodies.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::view::{CacheStats, CachedView, ViewKind};

/// Statistics of one view cache.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsBody {
    pub hits: u64,
    pub misses: u64,
    pub stores: u64,
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for CacheStatsBody {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            stores: stats.stores,
            total_entries: stats.total_entries,
        }
    }
}

/// One entry of the view cache.
#[derive(Debug, Clone, Serialize)]
pub struct CachedViewSummary {
    pub name: String,
    pub url: String,
    pub kind: ViewKind,
    pub resolved_at: DateTime<Utc>,
}

impl CachedViewSummary {
    pub fn new(name: impl Into<String>, cached: &CachedView) -> Self {
        Self {
            name: name.into(),
            url: cached.view.url().to_string(),
            kind: cached.view.kind(),
            resolved_at: cached.resolved_at,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Whether the resolver cache is in use
    pub cache_enabled: bool,
    /// View-name keyed cache
    pub view_cache: CacheStatsBody,
    /// View-name and locale keyed cache
    pub resolver_cache: CacheStatsBody,
    /// Contents of the view cache
    pub views: Vec<CachedViewSummary>,
}

/// Response body for clearing the resolver cache (DELETE /cache)
#[derive(Debug, Clone, Serialize)]
pub struct ClearCacheResponse {
    /// Success message
    pub message: String,
    /// Entries dropped
    pub removed: usize,
}

impl ClearCacheResponse {
    pub fn new(removed: usize) -> Self {
        Self {
            message: format!("Resolver cache cleared, {} entries removed", removed),
            removed,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
