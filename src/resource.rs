//! Resource Module
//!
//! Resource handles and the loaders that produce them. A loader never fails
//! on lookup: a missing resource is a handle whose `exists()` is false.

use std::collections::HashMap;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{Result, ViewError};

// == Resource ==
/// Where a resource's bytes live.
#[derive(Debug, Clone)]
enum Source {
    File(Option<PathBuf>),
    Inline(Option<Arc<str>>),
}

/// Handle to a resource addressed by a path string.
#[derive(Debug, Clone)]
pub struct Resource {
    path: String,
    source: Source,
}

impl Resource {
    /// A handle backed by a file on disk. `None` marks a path that could not be mapped.
    pub fn file(path: impl Into<String>, location: Option<PathBuf>) -> Self {
        Self {
            path: path.into(),
            source: Source::File(location),
        }
    }

    /// A handle backed by in-memory content. `None` marks a missing resource.
    pub fn inline(path: impl Into<String>, content: Option<Arc<str>>) -> Self {
        Self {
            path: path.into(),
            source: Source::Inline(content),
        }
    }

    /// The path this resource was requested under.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether the resource can be read.
    pub fn exists(&self) -> bool {
        match &self.source {
            Source::File(Some(location)) => location.is_file(),
            Source::File(None) => false,
            Source::Inline(content) => content.is_some(),
        }
    }

    /// Reads the whole resource as UTF-8 text.
    pub fn read_to_string(&self) -> Result<String> {
        match &self.source {
            Source::File(Some(location)) => {
                std::fs::read_to_string(location).map_err(|err| {
                    if err.kind() == std::io::ErrorKind::NotFound {
                        ViewError::NotFound(self.path.clone())
                    } else {
                        ViewError::io(self.path.clone(), err)
                    }
                })
            }
            Source::Inline(Some(content)) => Ok(content.to_string()),
            Source::File(None) | Source::Inline(None) => {
                Err(ViewError::NotFound(self.path.clone()))
            }
        }
    }
}

// == Resource Loader ==
/// Looks resources up by path string.
pub trait ResourceLoader: Send + Sync + fmt::Debug {
    /// Returns a handle for `path`. Existence is checked on the handle.
    fn get_resource(&self, path: &str) -> Resource;

    /// Short name used in log output.
    fn name(&self) -> &str;
}

// == File System Loader ==
/// Serves resources from a directory. Request paths are taken relative to it.
#[derive(Debug, Clone)]
pub struct FileSystemResourceLoader {
    root: PathBuf,
    name: String,
}

impl FileSystemResourceLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let name = format!("FileSystemResourceLoader({})", root.display());
        Self { root, name }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a request path under the root, rejecting anything that climbs out of it.
    fn locate(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        let mut located = self.root.clone();
        for component in relative.components() {
            match component {
                Component::Normal(part) => located.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
            }
        }
        Some(located)
    }
}

impl ResourceLoader for FileSystemResourceLoader {
    fn get_resource(&self, path: &str) -> Resource {
        Resource::file(path, self.locate(path))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

// == Memory Loader ==
/// Serves resources registered in memory. Useful for embedded views.
#[derive(Debug, Default)]
pub struct MemoryResourceLoader {
    resources: RwLock<HashMap<String, Arc<str>>>,
}

impl MemoryResourceLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the content served at `path`.
    pub fn insert(&self, path: impl Into<String>, content: impl Into<Arc<str>>) {
        self.resources.write().insert(path.into(), content.into());
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(self, path: impl Into<String>, content: impl Into<Arc<str>>) -> Self {
        self.insert(path, content);
        self
    }
}

impl ResourceLoader for MemoryResourceLoader {
    fn get_resource(&self, path: &str) -> Resource {
        let content = self.resources.read().get(path).cloned();
        Resource::inline(path, content)
    }

    fn name(&self) -> &str {
        "MemoryResourceLoader"
    }
}
