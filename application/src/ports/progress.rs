//! Progress notification port
//!
//! Defines the interface for reporting progress while calls are validated
//! and executed.

use callgate_domain::{CallResult, PlannedCall};

/// Callback for progress updates during governance
///
/// Implementations live in the presentation layer. Every method has a no-op
/// default so reporters only implement what they display.
pub trait GovernanceProgress: Send + Sync {
    /// Called once a plan has been partitioned
    fn on_validation_complete(&self, _approved: usize, _blocked: usize) {}

    /// Called before an approved call is invoked
    fn on_call_start(&self, _call: &PlannedCall) {}

    /// Called after a call produced its result
    fn on_call_complete(&self, _result: &CallResult) {}

    /// Called when the auto-invoke loop is stopped by the loop guard
    fn on_loop_terminated(&self, _reason: &str) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl GovernanceProgress for NoProgress {}
