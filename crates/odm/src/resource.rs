//! Loading of external JSON fragments.
//!
//! Mappings can pull pieces from resources: raw property mappings, dynamic
//! templates, runtime field documents, settings and complete entity mappings.
//! A [`ResourceLoader`] resolves a resource path to its text. Missing or
//! unreadable resources are errors; loaders never retry.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::ResourceError;

/// Resolves resource paths to their contents.
pub trait ResourceLoader: Send + Sync {
    /// Reads the resource as text.
    fn read_to_string(&self, path: &str) -> Result<String, ResourceError>;

    /// Reads the resource and parses it as JSON.
    fn read_json(&self, path: &str) -> Result<Value, ResourceError> {
        let content = self.read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| ResourceError::InvalidJson {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}

/// Reads resources from files below a root directory.
#[derive(Debug, Clone)]
pub struct FileSystemResourceLoader {
    root: PathBuf,
}

impl FileSystemResourceLoader {
    /// Creates a loader resolving paths against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        // Classpath-style paths may start with a slash; they are still relative to the root.
        self.root.join(path.trim_start_matches('/'))
    }
}

impl Default for FileSystemResourceLoader {
    fn default() -> Self {
        Self::new(".")
    }
}

impl ResourceLoader for FileSystemResourceLoader {
    fn read_to_string(&self, path: &str) -> Result<String, ResourceError> {
        let full_path = self.resolve(path);
        tracing::debug!(path = %full_path.display(), "Reading mapping resource");

        std::fs::read_to_string(&full_path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ResourceError::NotFound {
                path: path.to_string(),
            },
            _ => ResourceError::Unreadable {
                path: path.to_string(),
                message: e.to_string(),
            },
        })
    }
}

/// Serves resources from memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryResourceLoader {
    resources: HashMap<String, String>,
}

impl InMemoryResourceLoader {
    /// Creates an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a resource.
    pub fn with_resource(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    /// Adds or replaces a resource.
    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.resources.insert(path.into(), content.into());
    }
}

impl ResourceLoader for InMemoryResourceLoader {
    fn read_to_string(&self, path: &str) -> Result<String, ResourceError> {
        self.resources
            .get(path)
            .cloned()
            .ok_or_else(|| ResourceError::NotFound {
                path: path.to_string(),
            })
    }
}
