//! Configuration file loading for callgate
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `CALLGATE_*` environment variables (e.g. `CALLGATE_GOVERNANCE__MAX_CALLS_PER_PLAN=3`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./callgate.toml` or `./.callgate.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/callgate/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileAuditConfig, FileConfig, FileExecutionConfig, FileGovernanceConfig, FileLoggingConfig,
    FileOutputConfig,
};
pub use loader::ConfigLoader;
