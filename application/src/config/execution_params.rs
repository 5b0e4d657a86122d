//! Execution parameters: use case loop control.
//!
//! [`ExecutionParams`] groups the static parameters that control how approved
//! calls run in [`CallExecutor`](crate::use_cases::execute_calls::CallExecutor)
//! and how long the auto-invoke loop may go on. These are application-layer
//! concerns, not domain policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_MAX_MODEL_STEPS: usize = 10;

/// Execution control parameters.
///
/// | Use case | Uses `call_timeout` | Uses `max_model_steps` |
/// |----------|---------------------|------------------------|
/// | RunPlan  | Yes                 | No                     |
/// | AutoInvoke | Yes               | Yes                    |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Upper bound on a single invocation; `None` waits indefinitely.
    pub call_timeout: Option<Duration>,
    /// Maximum model steps (calls plus the final response) in one auto-invoke request.
    pub max_model_steps: usize,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            call_timeout: None,
            max_model_steps: DEFAULT_MAX_MODEL_STEPS,
        }
    }
}

impl ExecutionParams {
    // ==================== Builder Methods ====================

    pub fn with_call_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Timeout from an optional number of seconds
    pub fn with_call_timeout_seconds(self, seconds: Option<u64>) -> Self {
        self.with_call_timeout(seconds.map(Duration::from_secs))
    }

    pub fn with_max_model_steps(mut self, max: usize) -> Self {
        self.max_model_steps = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = ExecutionParams::default();
        assert!(params.call_timeout.is_none());
        assert_eq!(params.max_model_steps, 10);
    }

    #[test]
    fn test_builder() {
        let params = ExecutionParams::default()
            .with_call_timeout_seconds(Some(30))
            .with_max_model_steps(4);

        assert_eq!(params.call_timeout, Some(Duration::from_secs(30)));
        assert_eq!(params.max_model_steps, 4);
    }
}
