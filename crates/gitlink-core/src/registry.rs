//! Process-wide tag type registry
//!
//! Tag types are registered once during add-in initialization and looked up
//! by name whenever a link is created. Registration is idempotent: the first
//! type registered under a name wins and later attempts are no-ops.
//!
//! The registry is a cheap clonable handle; clones share the same table.

use crate::error::{Error, Result};
use crate::tag::{GitLink, LinkTagType, LinkTarget};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Shared table of registered tag types
#[derive(Debug, Clone, Default)]
pub struct TagRegistry {
    types: Arc<RwLock<HashMap<String, Arc<LinkTagType>>>>,
}

impl TagRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tag type under its name.
    ///
    /// Returns `true` if the type was newly registered, `false` if the name
    /// was already taken (the existing type is kept).
    pub fn register(&self, tag_type: LinkTagType) -> bool {
        let mut types = self.types.write();
        if types.contains_key(tag_type.name()) {
            debug!(name = tag_type.name(), "Tag type already registered");
            return false;
        }
        debug!(name = tag_type.name(), "Registering tag type");
        types.insert(tag_type.name().to_string(), Arc::new(tag_type));
        true
    }

    /// Check if a tag type is registered under `name`
    pub fn is_registered(&self, name: &str) -> bool {
        self.types.read().contains_key(name)
    }

    /// Look up a registered tag type
    pub fn get(&self, name: &str) -> Option<Arc<LinkTagType>> {
        self.types.read().get(name).cloned()
    }

    /// Create a fresh link instance of the type registered under `name`.
    pub fn create(&self, name: &str, target: LinkTarget) -> Result<GitLink> {
        let tag_type = self
            .get(name)
            .ok_or_else(|| Error::UnregisteredTagType(name.to_string()))?;
        Ok(GitLink::new(tag_type, target))
    }

    /// Number of registered tag types
    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    /// Check if no tag types are registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
