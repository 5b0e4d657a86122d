//! Application layer for callgate
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ExecutionParams, GovernanceConfig};
pub use ports::{
    audit_logger::{AuditEvent, AuditLogger, NoAuditLogger},
    model_driver::{DriverError, ModelDriver, ModelStep, Observation, Transcript},
    progress::{GovernanceProgress, NoProgress},
};
pub use use_cases::auto_invoke::{
    AutoInvokeError, AutoInvokeInput, AutoInvokeOutput, AutoInvokeUseCase,
};
pub use use_cases::execute_calls::CallExecutor;
pub use use_cases::run_plan::{RunPlanInput, RunPlanOutput, RunPlanUseCase};
