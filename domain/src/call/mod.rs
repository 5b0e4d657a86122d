//! Call domain module
//!
//! The per-request values flowing through the governance pipeline:
//!
//! - [`PlannedCall`]: one proposed call with untyped string arguments
//! - [`Plan`]: ordered batch of proposed calls (wire format `toolCalls`)
//! - [`CallResult`]: audit record produced for every proposed call
//!
//! None of these are persisted; they live for one request.

pub mod entities;
pub mod parser;

pub use entities::{CallResult, Plan, PlannedCall, call_key};
pub use parser::{parse_plan, parse_plan_json, parse_planned_call};
