//! Governance: the policies standing between a proposed call and its execution.
//!
//! # Plan mode
//!
//! ```text
//! Plan ──▶ PlanValidator ──▶ approved ──▶ (executor: resolve + coerce + invoke)
//!               │
//!               └──▶ blocked CallResults
//! ```
//!
//! # Auto-invoke mode
//!
//! The model calls functions one at a time; each call is screened by
//! [`InvocationLoopGuard`], which can also stop the loop outright.
//!
//! # Modules
//!
//! - [`resolver`]: name → callable lookup
//! - [`coercion`]: string arguments → typed [`ArgValue`](crate::plugin::ArgValue)s
//! - [`validator`]: plan partitioning
//! - [`safety`]: pluggable domain safety rules
//! - [`loop_guard`]: auto-invoke repetition and budget guard
//! - [`summary`]: rendering of the audit trail

pub mod coercion;
pub mod context;
pub mod loop_guard;
pub mod policy;
pub mod resolver;
pub mod safety;
pub mod summary;
pub mod validator;

pub use coercion::{CoercionError, coerce_arguments, coerce_parameter, coerce_value};
pub use context::{ConversationMessage, MessageRole, ValidationContext};
pub use loop_guard::{CALL_LIMIT_MESSAGE, GuardVerdict, InvocationLoopGuard};
pub use policy::GovernancePolicy;
pub use resolver::{ResolutionError, ResolvedCall, resolve};
pub use safety::{CreateThenUndoRule, SafetyRule, SafetyVerdict, TimezoneDiscussedRule, default_rules};
pub use summary::{NO_ACTIONS, render_summary};
pub use validator::{CallDecision, PlanValidator, ValidationOutcome};
