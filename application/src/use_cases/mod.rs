//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod auto_invoke;
pub mod execute_calls;
pub mod run_plan;
pub(crate) mod shared;
