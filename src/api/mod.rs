//! API Module
//!
//! HTTP handlers and routing for the view server.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /stats` - View cache statistics
//! - `DELETE /cache` - Clear the resolver cache
//! - `GET /:controller/:action` - Resolve and render a view

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
