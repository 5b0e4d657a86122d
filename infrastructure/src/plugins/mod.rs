//! Sample in-memory plugins
//!
//! Three small capability providers used by the CLI and by integration-style
//! tests. Between them they cover every parameter kind the coercion table
//! knows about: text, integer, boolean, enum, optional integer and the
//! implicit cancellation parameter.
//!
//! State lives behind `Arc<Mutex<_>>` shared by the function closures of a
//! single plugin instance; nothing is persisted.

pub mod reminders;
pub mod settings;
pub mod todos;

pub use reminders::RemindersPlugin;
pub use settings::SettingsPlugin;
pub use todos::TodosPlugin;

use callgate_domain::{CapabilityRegistry, InvocationError};
use std::sync::{Mutex, MutexGuard};

/// Registry holding a fresh instance of every sample plugin
pub fn sample_registry() -> CapabilityRegistry {
    CapabilityRegistry::new()
        .register(TodosPlugin::new())
        .register(RemindersPlugin::new())
        .register(SettingsPlugin::new())
}

/// Lock a plugin store, reporting poisoning as an invocation failure.
pub(crate) fn lock<T>(store: &Mutex<T>) -> Result<MutexGuard<'_, T>, InvocationError> {
    store
        .lock()
        .map_err(|_| InvocationError::new("plugin state is unavailable"))
}
