//! View Module
//!
//! Renderable views, the concurrent view cache, and the resolver that picks
//! between template pages and forwarded pages.

mod cache;
mod kinds;
mod resolver;
mod stats;


use std::fmt;
use std::io::Write;

use serde::Serialize;

use crate::engine::Model;
use crate::error::Result;

// Re-export public types
pub use cache::{CachedView, ViewCache};
pub use kinds::{ForwardView, RedirectView, TemplateView};
pub use resolver::{ViewResolver, FORWARD_URL_PREFIX, REDIRECT_URL_PREFIX, TEMPLATE_SUFFIX};
pub use stats::CacheStats;

// == Public Constants ==
/// Content type of views that do not negotiate one
pub const DEFAULT_CONTENT_TYPE: &str = "text/html;charset=UTF-8";

/// Which strategy produced a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    Template,
    Forward,
    Redirect,
}

/// A renderable view bound to a resolved URL.
pub trait View: Send + Sync + fmt::Debug {
    /// The resolved URL this view renders.
    fn url(&self) -> &str;

    fn kind(&self) -> ViewKind;

    fn content_type(&self) -> &str {
        DEFAULT_CONTENT_TYPE
    }

    /// Renders the view with `model` into `out`.
    fn render(&self, model: &Model, out: &mut dyn Write) -> Result<()>;

    /// Target location when the view answers with a redirect.
    fn redirect_location(&self) -> Option<&str> {
        None
    }
}
