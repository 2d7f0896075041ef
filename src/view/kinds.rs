//! View implementations produced by the resolver.

use std::io::Write;
use std::sync::Arc;

use tracing::debug;

use crate::engine::{Model, TemplateEngine};
use crate::error::{Result, ViewError};
use crate::resource::ResourceLoader;
use crate::view::{View, ViewKind, DEFAULT_CONTENT_TYPE};

// == Template View ==
/// A template page rendered by the template engine.
#[derive(Debug, Clone)]
pub struct TemplateView {
    url: String,
    content_type: String,
    engine: Arc<dyn TemplateEngine>,
}

impl TemplateView {
    pub fn new(url: impl Into<String>, engine: Arc<dyn TemplateEngine>) -> Self {
        Self {
            url: url.into(),
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            engine,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }
}

impl View for TemplateView {
    fn url(&self) -> &str {
        &self.url
    }

    fn kind(&self) -> ViewKind {
        ViewKind::Template
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn render(&self, model: &Model, out: &mut dyn Write) -> Result<()> {
        debug!("Rendering template view [{}]", self.url);
        self.engine.render(&self.url, model, out)
    }
}

// == Forward View ==
/// A page served as-is from the resource loader, without templating.
#[derive(Debug, Clone)]
pub struct ForwardView {
    url: String,
    loader: Arc<dyn ResourceLoader>,
}

impl ForwardView {
    pub fn new(url: impl Into<String>, loader: Arc<dyn ResourceLoader>) -> Self {
        Self {
            url: url.into(),
            loader,
        }
    }
}

impl View for ForwardView {
    fn url(&self) -> &str {
        &self.url
    }

    fn kind(&self) -> ViewKind {
        ViewKind::Forward
    }

    fn render(&self, _model: &Model, out: &mut dyn Write) -> Result<()> {
        debug!("Forwarding to [{}]", self.url);
        let content = self.loader.get_resource(&self.url).read_to_string()?;
        out.write_all(content.as_bytes())
            .map_err(|e| ViewError::io(self.url.clone(), e))
    }
}

// == Redirect View ==
/// Answers with a redirect to its URL. Renders no body.
#[derive(Debug, Clone)]
pub struct RedirectView {
    url: String,
}

impl RedirectView {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl View for RedirectView {
    fn url(&self) -> &str {
        &self.url
    }

    fn kind(&self) -> ViewKind {
        ViewKind::Redirect
    }

    fn render(&self, _model: &Model, _out: &mut dyn Write) -> Result<()> {
        Ok(())
    }

    fn redirect_location(&self) -> Option<&str> {
        Some(&self.url)
    }
}
