//! Invocation Loop Guard: per-request state machine for auto-invoke mode.
//!
//! In auto-invoke mode the model triggers functions one at a time from inside
//! its own reasoning loop. Before each real invocation the host asks the
//! guard for a [`GuardVerdict`]:
//!
//! | Verdict | Meaning | Host action |
//! |---------|---------|-------------|
//! | `Proceed` | call may run | invoke, record the result |
//! | `Blocked` | request budget spent (sticky) | feed the synthetic failure back to the model |
//! | `Terminate` | runaway repetition | stop the whole loop |

use super::policy::GovernancePolicy;
use crate::call::entities::call_key;

/// Synthetic function result returned to the model once the budget is spent
pub const CALL_LIMIT_MESSAGE: &str = "call limit reached for this request";

/// Decision for a single proposed invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardVerdict {
    Proceed,
    Blocked { message: String },
    Terminate { reason: String },
}

impl GuardVerdict {
    pub fn is_terminate(&self) -> bool {
        matches!(self, GuardVerdict::Terminate { .. })
    }
}

/// Guard state for one auto-invoke request
#[derive(Debug, Clone)]
pub struct InvocationLoopGuard {
    max_consecutive_repeats: usize,
    max_calls_per_request: usize,
    last_key: Option<String>,
    consecutive_repeats: usize,
    limit_reached: bool,
    count: usize,
}

impl InvocationLoopGuard {
    pub fn new(policy: &GovernancePolicy) -> Self {
        Self {
            max_consecutive_repeats: policy.max_consecutive_repeats,
            max_calls_per_request: policy.max_calls_per_request,
            last_key: None,
            consecutive_repeats: 0,
            limit_reached: false,
            count: 0,
        }
    }

    /// Decide whether `plugin.function` may run.
    ///
    /// Only `Proceed` counts against the request budget.
    pub fn check(&mut self, plugin_name: &str, function_name: &str) -> GuardVerdict {
        let key = call_key(plugin_name, function_name);

        if self.last_key.as_deref() == Some(key.as_str()) {
            self.consecutive_repeats += 1;
            if self.consecutive_repeats >= self.max_consecutive_repeats {
                return GuardVerdict::Terminate {
                    reason: format!(
                        "{} called {} times in a row",
                        key,
                        self.consecutive_repeats + 1
                    ),
                };
            }
        } else {
            self.consecutive_repeats = 0;
            self.last_key = Some(key);
        }

        if self.limit_reached || self.count >= self.max_calls_per_request {
            self.limit_reached = true;
            return GuardVerdict::Blocked {
                message: CALL_LIMIT_MESSAGE.to_string(),
            };
        }

        self.count += 1;
        GuardVerdict::Proceed
    }

    /// Real invocations allowed so far
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn limit_reached(&self) -> bool {
        self.limit_reached
    }
}
