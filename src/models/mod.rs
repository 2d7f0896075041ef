//! Request and Response models for the view server API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! parsing requests and serializing HTTP response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{validate_segment, RenderParams, FORMAT_PARAM};
pub use responses::{
    CacheStatsBody, CachedViewSummary, ClearCacheResponse, ErrorResponse, HealthResponse,
    StatsResponse,
};
