//! Governance configuration from TOML (`[governance]` section)

use callgate_domain::governance::policy::{
    DEFAULT_MAX_CALLS_PER_PLAN, DEFAULT_MAX_CALLS_PER_REQUEST, DEFAULT_MAX_CONSECUTIVE_REPEATS,
    default_timezone_keywords,
};
use callgate_domain::{ConfigIssue, ConfigIssueCode, GovernancePolicy};
use serde::{Deserialize, Serialize};

/// Raw governance configuration from TOML
///
/// # Example
///
/// ```toml
/// [governance]
/// max_calls_per_plan = 5
/// max_consecutive_repeats = 3
/// max_calls_per_request = 5
/// timezone_keywords = ["timezone", "time zone", "tz"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGovernanceConfig {
    /// Maximum approved calls per plan
    pub max_calls_per_plan: usize,
    /// Identical consecutive calls tolerated before blocking / terminating
    pub max_consecutive_repeats: usize,
    /// Maximum real invocations per auto-invoke request
    pub max_calls_per_request: usize,
    /// Keywords that must appear in recent conversation before a timezone change
    pub timezone_keywords: Vec<String>,
}

impl Default for FileGovernanceConfig {
    fn default() -> Self {
        Self {
            max_calls_per_plan: DEFAULT_MAX_CALLS_PER_PLAN,
            max_consecutive_repeats: DEFAULT_MAX_CONSECUTIVE_REPEATS,
            max_calls_per_request: DEFAULT_MAX_CALLS_PER_REQUEST,
            timezone_keywords: default_timezone_keywords(),
        }
    }
}

impl FileGovernanceConfig {
    /// Convert to a domain policy; zero limits fall back to their defaults.
    pub fn to_policy(&self) -> (GovernancePolicy, Vec<ConfigIssue>) {
        let mut issues = Vec::new();

        let max_calls_per_plan = non_zero(
            self.max_calls_per_plan,
            DEFAULT_MAX_CALLS_PER_PLAN,
            "governance.max_calls_per_plan",
            ConfigIssueCode::ZeroCallsPerPlan,
            &mut issues,
        );
        let max_consecutive_repeats = non_zero(
            self.max_consecutive_repeats,
            DEFAULT_MAX_CONSECUTIVE_REPEATS,
            "governance.max_consecutive_repeats",
            ConfigIssueCode::ZeroConsecutiveRepeats,
            &mut issues,
        );
        let max_calls_per_request = non_zero(
            self.max_calls_per_request,
            DEFAULT_MAX_CALLS_PER_REQUEST,
            "governance.max_calls_per_request",
            ConfigIssueCode::ZeroCallsPerRequest,
            &mut issues,
        );

        let keywords: Vec<String> = self
            .timezone_keywords
            .iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        if keywords.is_empty() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::EmptyTimezoneKeywords,
                "governance.timezone_keywords is empty: every timezone change will be blocked",
            ));
        }

        let policy = GovernancePolicy::default()
            .with_max_calls_per_plan(max_calls_per_plan)
            .with_max_consecutive_repeats(max_consecutive_repeats)
            .with_max_calls_per_request(max_calls_per_request)
            .with_timezone_keywords(keywords);

        (policy, issues)
    }
}

pub(super) fn non_zero(
    value: usize,
    default: usize,
    field: &str,
    code: ConfigIssueCode,
    issues: &mut Vec<ConfigIssue>,
) -> usize {
    if value == 0 {
        issues.push(ConfigIssue::error(
            code,
            format!("{}: must be at least 1, using default {}", field, default),
        ));
        default
    } else {
        value
    }
}
