//! View Resolver - plugin-aware template view resolution
//!
//! Picks between template pages and forwarded pages by probing which
//! resources exist, and caches the resolved views.

pub mod api;
pub mod config;
pub mod context;
pub mod converters;
pub mod engine;
pub mod error;
pub mod models;
pub mod negotiation;
pub mod plugins;
pub mod resource;
pub mod view;

pub use api::AppState;
pub use config::Config;
pub use error::{Result, ViewError};
pub use view::{View, ViewResolver};
