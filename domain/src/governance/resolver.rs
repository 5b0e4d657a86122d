//! Call Resolver
//!
//! Late binding from `(plugin name, function name)` strings to a concrete
//! [`PluginFunction`]. Purely a lookup: no side effects, no invocation.

use crate::plugin::function::PluginFunction;
use crate::plugin::registry::CapabilityRegistry;
use crate::plugin::traits::Plugin;
use thiserror::Error;

/// Why a call could not be bound to a callable
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("Missing plugin name")]
    MissingPluginName,

    #[error("Missing function name")]
    MissingFunctionName,

    #[error("Unknown plugin: {0}")]
    UnknownPlugin(String),

    #[error("Unknown function: {plugin}.{function}")]
    UnknownFunction { plugin: String, function: String },
}

/// Ephemeral binding of a call to its plugin and callable
#[derive(Clone, Copy)]
pub struct ResolvedCall<'a> {
    pub plugin: &'a dyn Plugin,
    pub function: &'a PluginFunction,
}

impl std::fmt::Debug for ResolvedCall<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedCall")
            .field("plugin", &self.plugin.name())
            .field("function", &self.function.name())
            .finish()
    }
}

/// Resolve a call against the registry (case-insensitive on both names).
pub fn resolve<'a>(
    registry: &'a CapabilityRegistry,
    plugin_name: &str,
    function_name: &str,
) -> Result<ResolvedCall<'a>, ResolutionError> {
    if plugin_name.trim().is_empty() {
        return Err(ResolutionError::MissingPluginName);
    }
    if function_name.trim().is_empty() {
        return Err(ResolutionError::MissingFunctionName);
    }

    let plugin = registry
        .get(plugin_name)
        .ok_or_else(|| ResolutionError::UnknownPlugin(plugin_name.to_string()))?;

    let function = plugin.function(function_name.trim()).ok_or_else(|| {
        ResolutionError::UnknownFunction {
            plugin: plugin.name().to_string(),
            function: function_name.to_string(),
        }
    })?;

    Ok(ResolvedCall {
        plugin: plugin.as_ref(),
        function,
    })
}
