//! Request DTOs for the view server API
//!
//! Turns path segments and query parameters into a view name and a model.

use std::collections::HashMap;

use serde_json::Value;

use crate::engine::Model;

/// Query parameter carrying an explicit response format.
pub const FORMAT_PARAM: &str = "format";

/// Parameters of a render request (GET /:controller/:action)
#[derive(Debug, Clone, Default)]
pub struct RenderParams {
    /// Explicit `format` parameter, if given
    pub format: Option<String>,
    /// Every other query parameter, as strings
    pub model: Model,
}

impl RenderParams {
    /// Splits the query string into the format parameter and the model.
    pub fn from_query(query: HashMap<String, String>) -> Self {
        let mut params = Self::default();
        for (key, value) in query {
            if key == FORMAT_PARAM {
                params.format = Some(value);
            } else {
                params.model.insert(key, Value::String(value));
            }
        }
        params
    }
}

/// Validates a controller or action path segment.
///
/// Returns an error message if validation fails, None if valid.
pub fn validate_segment(segment: &str) -> Option<String> {
    if segment.is_empty() {
        return Some("Path segment cannot be empty".to_string());
    }
    if segment.starts_with('.') {
        return Some(format!("Path segment '{}' cannot start with '.'", segment));
    }
    if !segment
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        return Some(format!("Path segment '{}' contains invalid characters", segment));
    }
    None
}
