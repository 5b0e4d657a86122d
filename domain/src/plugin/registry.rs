//! Capability Registry
//!
//! Case-insensitive mapping from plugin name to plugin instance. The
//! surrounding application builds one per conversation turn and hands it to
//! the validator and executor, which only ever read from it.

use super::traits::Plugin;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of available plugins, keyed by lowercase name
#[derive(Clone, Default)]
pub struct CapabilityRegistry {
    plugins: HashMap<String, Arc<dyn Plugin>>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin (builder pattern).
    ///
    /// A later plugin with the same name (ignoring case) replaces the earlier one.
    pub fn register<P: Plugin + 'static>(self, plugin: P) -> Self {
        self.register_arc(Arc::new(plugin))
    }

    /// Register a plugin (Arc version)
    pub fn register_arc(mut self, plugin: Arc<dyn Plugin>) -> Self {
        self.plugins.insert(plugin.name().to_lowercase(), plugin);
        self
    }

    /// Look up a plugin by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Plugin>> {
        self.plugins.get(&name.trim().to_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Registered plugins sorted by name
    pub fn plugins(&self) -> Vec<&Arc<dyn Plugin>> {
        let mut plugins: Vec<_> = self.plugins.values().collect();
        plugins.sort_by_key(|p| p.name().to_lowercase());
        plugins
    }

    /// Registered plugin names (as declared by each plugin), sorted
    pub fn names(&self) -> Vec<&str> {
        self.plugins().into_iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl std::fmt::Debug for CapabilityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityRegistry")
            .field("plugins", &self.names())
            .finish()
    }
}
