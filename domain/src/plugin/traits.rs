//! Plugin abstraction
//!
//! A [`Plugin`] is a named capability provider exposing a fixed registration
//! table of [`PluginFunction`]s. Lookup is by string at request time, but the
//! table itself is built once when the plugin is constructed.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ CapabilityRegistry  ("todos" → ToDos plugin) │
//! └──────────────────────────────────────────────┘
//!            │
//!            ▼
//! ┌──────────────────────────────────────────────┐
//! │ Plugin "ToDos"                                │
//! │   create_todo   → descriptor + invoker        │
//! │   complete_todo → descriptor + invoker        │
//! └──────────────────────────────────────────────┘
//! ```

use super::function::PluginFunction;

/// Capability provider exposing typed, invocable functions
pub trait Plugin: Send + Sync {
    /// Plugin name as registered (matched case-insensitively)
    fn name(&self) -> &str;

    /// Display description
    fn description(&self) -> &str {
        ""
    }

    /// Registration table in declaration order
    fn functions(&self) -> &[PluginFunction];

    /// Find a function by declared name (case-insensitive)
    fn function(&self, name: &str) -> Option<&PluginFunction> {
        self.functions()
            .iter()
            .find(|f| f.name().eq_ignore_ascii_case(name))
    }
}

/// Plugin backed by an explicit function table.
///
/// Most plugins are a name plus a handful of closures sharing a store; this
/// type covers that shape without a bespoke `impl Plugin`.
#[derive(Debug, Clone)]
pub struct PluginTable {
    name: String,
    description: String,
    functions: Vec<PluginFunction>,
}

impl PluginTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            functions: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a function to the table (builder pattern).
    ///
    /// A function whose name matches an existing entry (case-insensitive)
    /// replaces it.
    pub fn register(mut self, function: PluginFunction) -> Self {
        self.functions
            .retain(|f| !f.name().eq_ignore_ascii_case(function.name()));
        self.functions.push(function);
        self
    }
}

impl Plugin for PluginTable {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn functions(&self) -> &[PluginFunction] {
        &self.functions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::entities::FunctionDescriptor;

    fn noop(name: &str) -> PluginFunction {
        PluginFunction::sync(FunctionDescriptor::new(name, "noop"), |_| Ok(String::new()))
    }

    #[test]
    fn test_function_lookup_is_case_insensitive() {
        let plugin = PluginTable::new("ToDos")
            .register(noop("create_todo"))
            .register(noop("delete_todo"));

        assert!(plugin.function("CREATE_TODO").is_some());
        assert!(plugin.function("Delete_Todo").is_some());
        assert!(plugin.function("rename_todo").is_none());
    }

    #[test]
    fn test_register_replaces_same_name() {
        let plugin = PluginTable::new("ToDos")
            .register(noop("create_todo"))
            .register(noop("Create_Todo"));

        assert_eq!(plugin.functions().len(), 1);
        assert_eq!(plugin.functions()[0].name(), "Create_Todo");
    }
}
