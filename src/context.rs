//! Application Context Module
//!
//! The application-level registry the resolver consults at lookup time, and
//! the per-request context it is handed explicitly.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::resource::ResourceLoader;

/// Well-known id under which the running application is registered.
pub const APPLICATION_ID: &str = "application";

/// Well-known id of the live template resource loader.
pub const TEMPLATE_RESOURCE_LOADER: &str = "templateResourceLoader";

// == Application ==
/// The running web application as seen by the resolver.
pub trait Application: Send + Sync + fmt::Debug {
    /// True when the application runs from a deployment package rather than sources.
    fn is_packaged(&self) -> bool;
}

/// Plain application descriptor.
#[derive(Debug, Clone)]
pub struct WebApplication {
    pub name: String,
    pub packaged: bool,
}

impl WebApplication {
    pub fn new(name: impl Into<String>, packaged: bool) -> Self {
        Self {
            name: name.into(),
            packaged,
        }
    }
}

impl Application for WebApplication {
    fn is_packaged(&self) -> bool {
        self.packaged
    }
}

// == Application Context ==
/// A registered component.
#[derive(Debug, Clone)]
pub enum Bean {
    Application(Arc<dyn Application>),
    ResourceLoader(Arc<dyn ResourceLoader>),
}

/// Registry of named components, populated at startup.
#[derive(Debug, Clone, Default)]
pub struct ApplicationContext {
    beans: HashMap<String, Bean>,
}

impl ApplicationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an application under `id`, replacing any previous bean.
    pub fn register_application(&mut self, id: impl Into<String>, app: Arc<dyn Application>) {
        self.beans.insert(id.into(), Bean::Application(app));
    }

    /// Registers a resource loader under `id`, replacing any previous bean.
    pub fn register_resource_loader(
        &mut self,
        id: impl Into<String>,
        loader: Arc<dyn ResourceLoader>,
    ) {
        self.beans.insert(id.into(), Bean::ResourceLoader(loader));
    }

    pub fn contains_bean(&self, id: &str) -> bool {
        self.beans.contains_key(id)
    }

    /// Looks up an application bean. Beans of another kind yield `None`.
    pub fn application(&self, id: &str) -> Option<Arc<dyn Application>> {
        match self.beans.get(id) {
            Some(Bean::Application(app)) => Some(Arc::clone(app)),
            _ => None,
        }
    }

    /// Looks up a resource loader bean. Beans of another kind yield `None`.
    pub fn resource_loader(&self, id: &str) -> Option<Arc<dyn ResourceLoader>> {
        match self.beans.get(id) {
            Some(Bean::ResourceLoader(loader)) => Some(Arc::clone(loader)),
            _ => None,
        }
    }
}

// == Request Context ==
/// Identity of the controller handling the current request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ControllerRef {
    pub name: String,
}

impl ControllerRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// What the resolver needs to know about the request being rendered.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Controller currently rendering, if any
    pub controller: Option<ControllerRef>,
    /// Content format negotiated for the response, if any
    pub format: Option<String>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_controller(mut self, controller: ControllerRef) -> Self {
        self.controller = Some(controller);
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }
}
