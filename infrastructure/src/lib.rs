//! Infrastructure layer for callgate
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, configuration file loading, and the sample
//! in-memory plugins.

pub mod config;
pub mod drivers;
pub mod logging;
pub mod plugins;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileAuditConfig, FileConfig, FileExecutionConfig, FileGovernanceConfig,
    FileLoggingConfig, FileOutputConfig,
};
pub use drivers::{ScriptError, ScriptedModelDriver};
pub use logging::JsonlAuditLogger;
pub use plugins::{RemindersPlugin, SettingsPlugin, TodosPlugin, sample_registry};
