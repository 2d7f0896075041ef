//! View Resolver Module
//!
//! Evaluates which template resources exist for a view name and chooses
//! between a template view and the generic forwarding view.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::{Config, DEFAULT_FORWARD_SUFFIX, DEFAULT_VIEW_PREFIX};
use crate::context::{
    Application, ApplicationContext, RequestContext, APPLICATION_ID, TEMPLATE_RESOURCE_LOADER,
};
use crate::engine::TemplateEngine;
use crate::error::{Result, ViewError};
use crate::negotiation::mime_type_for;
use crate::plugins::PluginManager;
use crate::resource::ResourceLoader;
use crate::view::{
    CacheStats, CachedView, ForwardView, RedirectView, TemplateView, View, ViewCache,
};

/// Suffix of template pages.
pub const TEMPLATE_SUFFIX: &str = ".gsp";

/// View names starting with this resolve to a redirect.
pub const REDIRECT_URL_PREFIX: &str = "redirect:";

/// View names starting with this resolve to a forward, bypassing template lookup.
pub const FORWARD_URL_PREFIX: &str = "forward:";

/// Root under which plugin view directories live.
const WEB_INF: &str = "/WEB-INF";

/// A path worth probing, with the content type a match would carry.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Candidate {
    path: String,
    content_type: Option<String>,
}

// == View Resolver ==
/// Resolves view names to template views or forwarded views, caching the result.
#[derive(Debug)]
pub struct ViewResolver {
    prefix: String,
    template_suffix: String,
    forward_suffix: String,
    cache_enabled: bool,
    resource_loader: Arc<dyn ResourceLoader>,
    template_engine: Option<Arc<dyn TemplateEngine>>,
    plugin_manager: Option<Arc<dyn PluginManager>>,
    context: ApplicationContext,
    /// raw view name -> view; written on every load, never pruned
    view_cache: ViewCache,
    /// "{view name}_{locale}" -> view; only used when caching is enabled
    resolver_cache: ViewCache,
}

impl ViewResolver {
    // == Constructors ==
    /// Creates a resolver over `resource_loader` with default settings and caching on.
    pub fn new(resource_loader: Arc<dyn ResourceLoader>) -> Self {
        Self {
            prefix: DEFAULT_VIEW_PREFIX.to_string(),
            template_suffix: TEMPLATE_SUFFIX.to_string(),
            forward_suffix: DEFAULT_FORWARD_SUFFIX.to_string(),
            cache_enabled: true,
            resource_loader,
            template_engine: None,
            plugin_manager: None,
            context: ApplicationContext::new(),
            view_cache: ViewCache::new(),
            resolver_cache: ViewCache::new(),
        }
    }

    /// Creates a resolver configured from `config`. Caching is off in development.
    pub fn from_config(config: &Config, resource_loader: Arc<dyn ResourceLoader>) -> Self {
        Self::new(resource_loader)
            .with_prefix(config.view_prefix.clone())
            .with_forward_suffix(config.forward_suffix.clone())
            .with_cache(config.cache_views())
    }

    // == Wiring ==
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_template_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.template_suffix = suffix.into();
        self
    }

    pub fn with_forward_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.forward_suffix = suffix.into();
        self
    }

    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    pub fn with_template_engine(mut self, engine: Arc<dyn TemplateEngine>) -> Self {
        self.template_engine = Some(engine);
        self
    }

    pub fn set_template_engine(&mut self, engine: Arc<dyn TemplateEngine>) {
        self.template_engine = Some(engine);
    }

    pub fn with_plugin_manager(mut self, manager: Arc<dyn PluginManager>) -> Self {
        self.plugin_manager = Some(manager);
        self
    }

    pub fn with_application_context(mut self, context: ApplicationContext) -> Self {
        self.context = context;
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn is_cache_enabled(&self) -> bool {
        self.cache_enabled
    }

    // == Resolve ==
    /// Resolves `view_name` for `locale`, consulting the resolver cache when enabled.
    pub fn resolve_view_name(
        &self,
        view_name: &str,
        locale: &str,
        request: &RequestContext,
    ) -> Result<Arc<dyn View>> {
        if !self.cache_enabled {
            return self.create_view(view_name, locale, request);
        }

        let key = cache_key(view_name, locale);
        if let Some(view) = self.resolver_cache.get(&key) {
            return Ok(view);
        }

        let view = self.create_view(view_name, locale, request)?;
        self.resolver_cache.put(key, Arc::clone(&view));
        Ok(view)
    }

    /// Handles the `redirect:` and `forward:` prefixes, then loads the view.
    fn create_view(
        &self,
        view_name: &str,
        locale: &str,
        request: &RequestContext,
    ) -> Result<Arc<dyn View>> {
        if let Some(url) = view_name.strip_prefix(REDIRECT_URL_PREFIX) {
            debug!("Resolved redirect view to [{}]", url);
            return Ok(Arc::new(RedirectView::new(url)));
        }
        if let Some(url) = view_name.strip_prefix(FORWARD_URL_PREFIX) {
            debug!("Resolved forward view to [{}]", url);
            return Ok(Arc::new(ForwardView::new(url, Arc::clone(&self.resource_loader))));
        }
        self.load_view(view_name, locale, request)
    }

    // == Load ==
    /// Picks the first existing template for `view_name`, else a forwarding view.
    ///
    /// Candidates are probed in order: the format-suffixed default path, the
    /// format-suffixed controller/plugin path, the plain default path, the plain
    /// controller/plugin path. The result is cached under the raw view name and
    /// returned from the cache on later calls unless the engine reloads templates.
    ///
    /// # Errors
    /// [`ViewError::MissingTemplateEngine`] when no engine was configured; no
    /// resources are probed in that case.
    pub fn load_view(
        &self,
        view_name: &str,
        locale: &str,
        request: &RequestContext,
    ) -> Result<Arc<dyn View>> {
        let engine = self
            .template_engine
            .as_ref()
            .ok_or(ViewError::MissingTemplateEngine)?;

        if !engine.is_reload_enabled() {
            if let Some(view) = self.view_cache.get(view_name) {
                return Ok(view);
            }
        }

        let application = self.context.application(APPLICATION_ID);
        let loader = self.establish_resource_loader(application.as_deref());
        let plugin_path = self.plugin_views_path(request, application.is_some());
        let candidates = self.candidates(view_name, request.format.as_deref(), plugin_path.as_deref());

        let view: Arc<dyn View> = match find_existing(&candidates, loader.as_ref()) {
            Some(candidate) => {
                debug!("Resolved template view at URI [{}] (locale {})", candidate.path, locale);
                let mut view = TemplateView::new(candidate.path.clone(), Arc::clone(engine));
                if let Some(content_type) = &candidate.content_type {
                    view = view.with_content_type(content_type.clone());
                }
                Arc::new(view)
            }
            None => {
                if let Some(format) = &request.format {
                    warn!(
                        "No [{}] template found for view [{}], forwarding instead",
                        format, view_name
                    );
                }
                self.build_view(view_name)
            }
        };

        self.view_cache.put(view_name, Arc::clone(&view));
        Ok(view)
    }

    /// Paths probed for `view_name` under `request`, in probing order.
    pub fn candidate_paths(&self, view_name: &str, request: &RequestContext) -> Vec<String> {
        let has_application = self.context.application(APPLICATION_ID).is_some();
        let plugin_path = self.plugin_views_path(request, has_application);
        self.candidates(view_name, request.format.as_deref(), plugin_path.as_deref())
            .into_iter()
            .map(|candidate| candidate.path)
            .collect()
    }

    fn candidates(
        &self,
        view_name: &str,
        format: Option<&str>,
        plugin_path: Option<&str>,
    ) -> Vec<Candidate> {
        let mut candidates: Vec<Candidate> = Vec::with_capacity(4);
        let mut push = |path: String, content_type: Option<String>| {
            if !candidates.iter().any(|c| c.path == path) {
                candidates.push(Candidate { path, content_type });
            }
        };

        if let Some(format) = format {
            let content_type = mime_type_for(format).map(|mime| format!("{};charset=UTF-8", mime));
            let suffix = format!(".{}{}", format, self.template_suffix);
            push(self.default_path(view_name, &suffix), content_type.clone());
            push(self.controller_path(view_name, &suffix, plugin_path), content_type);
        }

        push(self.default_path(view_name, &self.template_suffix), None);
        push(self.controller_path(view_name, &self.template_suffix, plugin_path), None);

        candidates
    }

    fn default_path(&self, view_name: &str, suffix: &str) -> String {
        format!("{}{}{}", self.prefix, view_name, suffix)
    }

    /// Path relative to the rendering controller, which may live in a plugin.
    fn controller_path(&self, view_name: &str, suffix: &str, plugin_path: Option<&str>) -> String {
        match plugin_path {
            Some(path) => format!("{}{}{}{}", WEB_INF, path, view_name, suffix),
            None => self.default_path(view_name, suffix),
        }
    }

    fn plugin_views_path(&self, request: &RequestContext, has_application: bool) -> Option<String> {
        if !has_application {
            return None;
        }
        let controller = request.controller.as_ref()?;
        self.plugin_manager
            .as_ref()?
            .plugin_views_path_for(controller)
    }

    /// Prefers the live template loader unless the application runs packaged.
    fn establish_resource_loader(
        &self,
        application: Option<&dyn Application>,
    ) -> Arc<dyn ResourceLoader> {
        let unpackaged = application.is_some_and(|app| !app.is_packaged());
        if unpackaged && self.context.contains_bean(TEMPLATE_RESOURCE_LOADER) {
            if let Some(loader) = self.context.resource_loader(TEMPLATE_RESOURCE_LOADER) {
                return loader;
            }
        }
        Arc::clone(&self.resource_loader)
    }

    /// The generic URL-based view: `{prefix}{viewName}{forwardSuffix}`.
    fn build_view(&self, view_name: &str) -> Arc<dyn View> {
        let url = format!("{}{}{}", self.prefix, view_name, self.forward_suffix);
        debug!("Falling back to forward view [{}]", url);
        Arc::new(ForwardView::new(url, Arc::clone(&self.resource_loader)))
    }

    // == Cache Management ==
    /// Clears the resolver cache, returning how many entries were dropped.
    /// The view cache is left as is.
    pub fn clear_cache(&self) -> usize {
        self.resolver_cache.clear()
    }

    /// Drops one resolver cache entry. Returns whether it was cached.
    pub fn remove_from_cache(&self, view_name: &str, locale: &str) -> bool {
        self.resolver_cache.remove(&cache_key(view_name, locale))
    }

    pub fn view_cache_stats(&self) -> CacheStats {
        self.view_cache.stats()
    }

    pub fn resolver_cache_stats(&self) -> CacheStats {
        self.resolver_cache.stats()
    }

    /// Snapshot of the view cache, sorted by view name.
    pub fn cached_views(&self) -> Vec<(String, CachedView)> {
        self.view_cache.entries()
    }
}

fn cache_key(view_name: &str, locale: &str) -> String {
    format!("{}_{}", view_name, locale)
}

fn find_existing<'a>(candidates: &'a [Candidate], loader: &dyn ResourceLoader) -> Option<&'a Candidate> {
    candidates.iter().find(|candidate| {
        debug!(
            "Attempting to resolve view for URI [{}] using ResourceLoader [{}]",
            candidate.path,
            loader.name()
        );
        loader.get_resource(&candidate.path).exists()
    })
}
