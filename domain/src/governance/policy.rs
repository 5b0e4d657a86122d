//! Governance policy: static limits applied to proposed calls.
//!
//! [`GovernancePolicy`] carries the thresholds shared by the
//! [`PlanValidator`](super::validator::PlanValidator) and the
//! [`InvocationLoopGuard`](super::loop_guard::InvocationLoopGuard).

use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_CALLS_PER_PLAN: usize = 5;
pub const DEFAULT_MAX_CONSECUTIVE_REPEATS: usize = 3;
pub const DEFAULT_MAX_CALLS_PER_REQUEST: usize = 5;

/// Keywords that count as "the user talked about timezones"
pub fn default_timezone_keywords() -> Vec<String> {
    vec!["timezone".to_string(), "time zone".to_string(), "tz".to_string()]
}

/// Governance limits and keyword lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernancePolicy {
    /// Maximum approved calls in a single plan
    pub max_calls_per_plan: usize,
    /// Repeat count at which an identical consecutive call is refused
    /// (plan mode) or the loop is terminated (auto-invoke mode)
    pub max_consecutive_repeats: usize,
    /// Maximum real invocations per auto-invoke request
    pub max_calls_per_request: usize,
    /// Keywords gating timezone changes (matched case-insensitively)
    pub timezone_keywords: Vec<String>,
}

impl Default for GovernancePolicy {
    fn default() -> Self {
        Self {
            max_calls_per_plan: DEFAULT_MAX_CALLS_PER_PLAN,
            max_consecutive_repeats: DEFAULT_MAX_CONSECUTIVE_REPEATS,
            max_calls_per_request: DEFAULT_MAX_CALLS_PER_REQUEST,
            timezone_keywords: default_timezone_keywords(),
        }
    }
}

impl GovernancePolicy {
    // ==================== Builder Methods ====================

    pub fn with_max_calls_per_plan(mut self, max: usize) -> Self {
        self.max_calls_per_plan = max;
        self
    }

    pub fn with_max_consecutive_repeats(mut self, max: usize) -> Self {
        self.max_consecutive_repeats = max;
        self
    }

    pub fn with_max_calls_per_request(mut self, max: usize) -> Self {
        self.max_calls_per_request = max;
        self
    }

    pub fn with_timezone_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.timezone_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let policy = GovernancePolicy::default();
        assert_eq!(policy.max_calls_per_plan, 5);
        assert_eq!(policy.max_consecutive_repeats, 3);
        assert_eq!(policy.max_calls_per_request, 5);
        assert_eq!(policy.timezone_keywords, vec!["timezone", "time zone", "tz"]);
    }

    #[test]
    fn test_builder() {
        let policy = GovernancePolicy::default()
            .with_max_calls_per_plan(2)
            .with_max_consecutive_repeats(4)
            .with_max_calls_per_request(8)
            .with_timezone_keywords(["zone"]);

        assert_eq!(policy.max_calls_per_plan, 2);
        assert_eq!(policy.max_consecutive_repeats, 4);
        assert_eq!(policy.max_calls_per_request, 8);
        assert_eq!(policy.timezone_keywords, vec!["zone"]);
    }
}
