//! Plugin Module
//!
//! Maps controllers to the plugin that contributed them, so their views can
//! be looked up in the plugin's own view directory.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::context::ControllerRef;
use crate::error::{Result, ViewError};

/// Resolves the view directory of the plugin a controller comes from.
pub trait PluginManager: Send + Sync + fmt::Debug {
    /// Views path of the owning plugin, or `None` for host application controllers.
    fn plugin_views_path_for(&self, controller: &ControllerRef) -> Option<String>;
}

/// One entry of a plugin manifest.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PluginDescriptor {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub controllers: Vec<String>,
}

impl PluginDescriptor {
    pub fn views_path(&self) -> String {
        format!("/plugins/{}-{}/grails-app/views", self.name, self.version)
    }
}

/// Plugin manager backed by a fixed list of descriptors.
#[derive(Debug, Default)]
pub struct RegistryPluginManager {
    plugins: Vec<PluginDescriptor>,
    /// controller name -> index into `plugins`
    owners: HashMap<String, usize>,
}

impl RegistryPluginManager {
    /// Builds the registry. If two plugins claim a controller, the later one owns it.
    pub fn new(plugins: Vec<PluginDescriptor>) -> Self {
        let mut owners = HashMap::new();
        for (index, plugin) in plugins.iter().enumerate() {
            for controller in &plugin.controllers {
                owners.insert(controller.clone(), index);
            }
        }
        Self { plugins, owners }
    }

    /// Parses a JSON array of plugin descriptors.
    pub fn from_json(json: &str) -> Result<Self> {
        let plugins: Vec<PluginDescriptor> = serde_json::from_str(json)
            .map_err(|e| ViewError::InvalidRequest(format!("Invalid plugin manifest: {}", e)))?;
        Ok(Self::new(plugins))
    }

    /// Loads a JSON plugin manifest from disk.
    pub fn from_manifest(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| ViewError::io(path.display().to_string(), e))?;
        Self::from_json(&json)
    }

    pub fn plugins(&self) -> &[PluginDescriptor] {
        &self.plugins
    }
}

impl PluginManager for RegistryPluginManager {
    fn plugin_views_path_for(&self, controller: &ControllerRef) -> Option<String> {
        self.owners
            .get(&controller.name)
            .map(|&index| self.plugins[index].views_path())
    }
}
