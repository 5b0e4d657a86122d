//! Domain layer for callgate
//!
//! This crate contains the governance rules, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns and
//! performs no I/O.
//!
//! # Core Concepts
//!
//! ## Plugins
//!
//! Capabilities a model may act through. Each plugin exposes an explicit
//! table of typed functions, looked up by name through the
//! [`CapabilityRegistry`].
//!
//! ## Governance
//!
//! - **Plan mode**: a whole batch of proposed calls is validated up front
//!   ([`PlanValidator`]) and only approved calls run.
//! - **Auto-invoke mode**: the model calls functions one by one, each screened
//!   by the [`InvocationLoopGuard`].
//!
//! Every proposed call ends up as exactly one [`CallResult`] in the audit trail.

pub mod call;
pub mod config;
pub mod core;
pub mod governance;
pub mod plugin;

// Re-export commonly used types
pub use call::{CallResult, Plan, PlannedCall, call_key, parse_plan, parse_plan_json};
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use core::error::DomainError;
pub use governance::{
    CALL_LIMIT_MESSAGE, CallDecision, CoercionError, ConversationMessage, GovernancePolicy,
    GuardVerdict, InvocationLoopGuard, MessageRole, PlanValidator, ResolutionError, ResolvedCall,
    SafetyRule, SafetyVerdict, ValidationContext, ValidationOutcome, coerce_arguments,
    render_summary, resolve,
};
pub use plugin::{
    ArgValue, CapabilityRegistry, FunctionDescriptor, InvocationArgs, InvocationError,
    InvocationOutput, ParamKind, ParameterSpec, Plugin, PluginFunction, PluginTable,
};
