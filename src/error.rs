//! Error types for view resolution
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::converters::ConversionError;
use crate::models::ErrorResponse;

// == View Error Enum ==
/// Unified error type for view resolution and rendering.
#[derive(Error, Debug)]
pub enum ViewError {
    /// The resolver was asked to load a view before a template engine was set
    #[error("No template engine configured for view resolution")]
    MissingTemplateEngine,

    /// Resource or view not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Reading a resource failed
    #[error("I/O error reading [{path}]: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Template rendering failed
    #[error("Render failed: {0}")]
    Render(String),

    /// A converter failed while rendering itself
    #[error("Conversion failed: {0}")]
    Conversion(#[source] ConversionError),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ViewError {
    /// Wraps an I/O failure together with the resource path it concerns.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        ViewError::Io {
            path: path.into(),
            source,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ViewError {
    fn into_response(self) -> Response {
        let status = match &self {
            ViewError::NotFound(_) => StatusCode::NOT_FOUND,
            ViewError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ViewError::MissingTemplateEngine
            | ViewError::Io { .. }
            | ViewError::Render(_)
            | ViewError::Conversion(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for view resolution.
pub type Result<T> = std::result::Result<T, ViewError>;
