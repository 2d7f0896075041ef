//! Template Engine Module
//!
//! The template engine is consumed through [`TemplateEngine`]. The bundled
//! [`PlaceholderTemplateEngine`] only substitutes `${path}` expressions.

use std::fmt;
use std::io::Write;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::{Result, ViewError};
use crate::resource::ResourceLoader;

/// Data a view is rendered with.
pub type Model = Map<String, Value>;

/// Compiles and executes template pages.
pub trait TemplateEngine: Send + Sync + fmt::Debug {
    /// Whether templates are re-read on change, which disables view caching.
    fn is_reload_enabled(&self) -> bool;

    /// Renders the template at `uri` with `model` into `out`.
    fn render(&self, uri: &str, model: &Model, out: &mut dyn Write) -> Result<()>;
}

/// Engine that replaces `${a.b}` with values from the model.
#[derive(Debug, Clone)]
pub struct PlaceholderTemplateEngine {
    loader: Arc<dyn ResourceLoader>,
    reload_enabled: bool,
}

impl PlaceholderTemplateEngine {
    pub fn new(loader: Arc<dyn ResourceLoader>, reload_enabled: bool) -> Self {
        Self {
            loader,
            reload_enabled,
        }
    }
}

impl TemplateEngine for PlaceholderTemplateEngine {
    fn is_reload_enabled(&self) -> bool {
        self.reload_enabled
    }

    fn render(&self, uri: &str, model: &Model, out: &mut dyn Write) -> Result<()> {
        let source = self.loader.get_resource(uri).read_to_string()?;
        let rendered = substitute(&source, model)?;
        out.write_all(rendered.as_bytes())
            .map_err(|e| ViewError::io(uri, e))
    }
}

/// Expands every `${expr}` in `source`. An unterminated expression is an error.
fn substitute(source: &str, model: &Model) -> Result<String> {
    let mut output = String::with_capacity(source.len());
    let mut rest = source;

    while let Some(start) = rest.find("${") {
        output.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after.find('}').ok_or_else(|| {
            ViewError::Render(format!("Unterminated expression at offset {}", source.len() - rest.len() + start))
        })?;
        let expr = after[..end].trim();
        match lookup(model, expr) {
            Some(Value::String(s)) => output.push_str(s),
            Some(Value::Null) | None => {}
            Some(other) => output.push_str(&other.to_string()),
        }
        rest = &after[end + 1..];
    }

    output.push_str(rest);
    Ok(output)
}

fn lookup<'a>(model: &'a Model, expr: &str) -> Option<&'a Value> {
    let mut parts = expr.split('.');
    let mut current = model.get(parts.next()?)?;
    for part in parts {
        current = match current {
            Value::Object(map) => map.get(part)?,
            Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::MemoryResourceLoader;
    use serde_json::json;

    fn model(value: Value) -> Model {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("test models are objects"),
        }
    }

    #[test]
    fn test_substitutes_nested_values() {
        let m = model(json!({"book": {"title": "Dune", "tags": ["sf", "classic"]}, "count": 3}));
        let out = substitute("${book.title} (${count}) ${book.tags.1}", &m).unwrap();
        assert_eq!(out, "Dune (3) classic");
    }

    #[test]
    fn test_missing_values_render_empty() {
        let m = model(json!({"a": null}));
        assert_eq!(substitute("[${a}][${b.c}]", &m).unwrap(), "[][]");
    }

    #[test]
    fn test_unterminated_expression() {
        let result = substitute("hello ${name", &Model::new());
        assert!(matches!(result, Err(ViewError::Render(_))));
    }

    #[test]
    fn test_engine_renders_through_loader() {
        let loader = Arc::new(MemoryResourceLoader::new().with("/v/hello.gsp", "Hi ${name}!"));
        let engine = PlaceholderTemplateEngine::new(loader, true);
        assert!(engine.is_reload_enabled());

        let mut out = Vec::new();
        engine
            .render("/v/hello.gsp", &model(json!({"name": "Ada"})), &mut out)
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Hi Ada!");
    }

    #[test]
    fn test_engine_missing_template() {
        let engine = PlaceholderTemplateEngine::new(Arc::new(MemoryResourceLoader::new()), false);
        let result = engine.render("/v/none.gsp", &Model::new(), &mut Vec::new());
        assert!(matches!(result, Err(ViewError::NotFound(_))));
    }
}
