//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`ExecutionParams`]: per-call timeout and auto-invoke step limit
//! - [`GovernanceConfig`]: policy plus execution params, held by the binary

pub mod execution_params;
pub mod governance_config;

pub use execution_params::ExecutionParams;
pub use governance_config::GovernanceConfig;
