//! Structured configuration issues.
//!
//! Produced by the infrastructure config validator and rendered by the CLI.
//! Errors mean a value was ignored in favour of its default; warnings mean
//! the value is accepted but probably not what was intended.

use std::fmt;

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The value cannot work and was replaced by its default.
    Error,
    /// The value works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// `governance.max_calls_per_plan` is zero
    ZeroCallsPerPlan,
    /// `governance.max_consecutive_repeats` is zero
    ZeroConsecutiveRepeats,
    /// `governance.max_calls_per_request` is zero
    ZeroCallsPerRequest,
    /// `execution.max_model_steps` is zero
    ZeroModelSteps,
    /// `execution.call_timeout_seconds` is zero
    ZeroCallTimeout,
    /// `governance.timezone_keywords` is empty: every timezone change is blocked
    EmptyTimezoneKeywords,
}

/// A detected issue in the loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", label, self.message)
    }
}
