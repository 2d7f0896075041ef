//! API Handlers
//!
//! HTTP request handlers that resolve and render views.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::Config;
use crate::context::{
    ApplicationContext, ControllerRef, RequestContext, WebApplication, APPLICATION_ID,
    TEMPLATE_RESOURCE_LOADER,
};
use crate::converters::{Converter, JsonConverter};
use crate::engine::PlaceholderTemplateEngine;
use crate::error::{Result, ViewError};
use crate::models::{
    validate_segment, CachedViewSummary, ClearCacheResponse, HealthResponse, RenderParams,
    StatsResponse,
};
use crate::negotiation::negotiate;
use crate::plugins::RegistryPluginManager;
use crate::resource::{FileSystemResourceLoader, ResourceLoader};
use crate::view::{ViewKind, ViewResolver};

/// Application state shared across all handlers.
///
/// The resolver synchronises its own caches, so it is shared behind a plain Arc.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<ViewResolver>,
    /// Locale used when the request sends no Accept-Language
    pub default_locale: String,
}

impl AppState {
    /// Creates a new AppState around a fully wired resolver.
    pub fn new(resolver: ViewResolver, default_locale: impl Into<String>) -> Self {
        Self {
            resolver: Arc::new(resolver),
            default_locale: default_locale.into(),
        }
    }

    /// Wires loaders, application context, template engine and plugins from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let default_loader: Arc<dyn ResourceLoader> =
            Arc::new(FileSystemResourceLoader::new(&config.views_root));

        let mut context = ApplicationContext::new();
        context.register_application(
            APPLICATION_ID,
            Arc::new(WebApplication::new(env!("CARGO_PKG_NAME"), config.packaged)),
        );

        let mut engine_loader = Arc::clone(&default_loader);
        if let Some(root) = &config.template_source_root {
            let live: Arc<dyn ResourceLoader> = Arc::new(FileSystemResourceLoader::new(root));
            context.register_resource_loader(TEMPLATE_RESOURCE_LOADER, Arc::clone(&live));
            if !config.packaged {
                info!("Serving templates live from {}", root.display());
                engine_loader = live;
            }
        }

        let engine = PlaceholderTemplateEngine::new(engine_loader, config.reload_enabled);
        let mut resolver = ViewResolver::from_config(config, default_loader)
            .with_template_engine(Arc::new(engine))
            .with_application_context(context);

        if let Some(path) = &config.plugin_manifest {
            let plugins = RegistryPluginManager::from_manifest(path)?;
            info!(
                "Loaded {} plugins from {}",
                plugins.plugins().len(),
                path.display()
            );
            resolver = resolver.with_plugin_manager(Arc::new(plugins));
        }

        Ok(Self::new(resolver, config.default_locale.clone()))
    }
}

/// First language tag of an Accept-Language header, ignoring wildcards.
fn locale_from_header(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::ACCEPT_LANGUAGE)?.to_str().ok()?;
    value
        .split(',')
        .map(|part| part.split(';').next().unwrap_or("").trim())
        .find(|tag| !tag.is_empty() && *tag != "*")
        .map(str::to_string)
}

/// Handler for GET /:controller/:action
///
/// Resolves `/{controller}/{action}` for the negotiated format and renders it
/// with the query parameters as the model.
pub async fn render_handler(
    State(state): State<AppState>,
    Path((controller, action)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Response> {
    for segment in [&controller, &action] {
        if let Some(error_msg) = validate_segment(segment) {
            return Err(ViewError::InvalidRequest(error_msg));
        }
    }

    let params = RenderParams::from_query(query);
    let accept = headers.get(header::ACCEPT).and_then(|v| v.to_str().ok());
    let negotiated = negotiate(&action, params.format.as_deref(), accept);
    let locale = locale_from_header(&headers).unwrap_or_else(|| state.default_locale.clone());
    let view_name = format!("/{}/{}", controller, negotiated.action);

    let request = RequestContext {
        controller: Some(ControllerRef::new(controller)),
        format: negotiated.format,
    };
    debug!(
        "Rendering view [{}] format={:?} locale={}",
        view_name, request.format, locale
    );

    // Resource probing and rendering are blocking file I/O.
    let resolver = Arc::clone(&state.resolver);
    tokio::task::spawn_blocking(move || render_view(&resolver, &view_name, &locale, &request, params))
        .await
        .map_err(|e| ViewError::Render(format!("Render task failed: {}", e)))?
}

fn render_view(
    resolver: &ViewResolver,
    view_name: &str,
    locale: &str,
    request: &RequestContext,
    params: RenderParams,
) -> Result<Response> {
    let view = resolver.resolve_view_name(view_name, locale, request)?;

    if let Some(location) = view.redirect_location() {
        return Ok((StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response());
    }

    if request.format.as_deref() == Some("json") && view.kind() != ViewKind::Template {
        let converter = JsonConverter::new(Value::Object(params.model));
        let body = converter.render_to_string()?;
        return Ok((
            [(header::CONTENT_TYPE, converter.content_type().to_string())],
            body,
        )
            .into_response());
    }

    let mut body = Vec::new();
    view.render(&params.model, &mut body)?;
    Ok(([(header::CONTENT_TYPE, view.content_type().to_string())], body).into_response())
}

/// Handler for GET /stats
///
/// Returns statistics and contents of the view caches.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let resolver = &state.resolver;
    let views = resolver
        .cached_views()
        .iter()
        .map(|(name, cached)| CachedViewSummary::new(name.clone(), cached))
        .collect();

    Json(StatsResponse {
        cache_enabled: resolver.is_cache_enabled(),
        view_cache: resolver.view_cache_stats().into(),
        resolver_cache: resolver.resolver_cache_stats().into(),
        views,
    })
}

/// Handler for DELETE /cache
///
/// Clears the locale-keyed resolver cache.
pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<ClearCacheResponse> {
    let removed = state.resolver.clear_cache();
    info!("Resolver cache cleared ({} entries)", removed);
    Json(ClearCacheResponse::new(removed))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
