//! Execution configuration from TOML (`[execution]` section)

use super::governance::non_zero;
use callgate_application::ExecutionParams;
use callgate_application::config::execution_params::DEFAULT_MAX_MODEL_STEPS;
use callgate_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Raw execution configuration from TOML
///
/// ```toml
/// [execution]
/// call_timeout_seconds = 30   # omit to wait indefinitely
/// max_model_steps = 10
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExecutionConfig {
    pub call_timeout_seconds: Option<u64>,
    pub max_model_steps: usize,
}

impl Default for FileExecutionConfig {
    fn default() -> Self {
        Self {
            call_timeout_seconds: None,
            max_model_steps: DEFAULT_MAX_MODEL_STEPS,
        }
    }
}

impl FileExecutionConfig {
    pub fn to_params(&self) -> (ExecutionParams, Vec<ConfigIssue>) {
        let mut issues = Vec::new();

        let timeout = match self.call_timeout_seconds {
            Some(0) => {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::ZeroCallTimeout,
                    "execution.call_timeout_seconds: must be at least 1, disabling the timeout",
                ));
                None
            }
            other => other,
        };
        let max_model_steps = non_zero(
            self.max_model_steps,
            DEFAULT_MAX_MODEL_STEPS,
            "execution.max_model_steps",
            ConfigIssueCode::ZeroModelSteps,
            &mut issues,
        );

        let params = ExecutionParams::default()
            .with_call_timeout_seconds(timeout)
            .with_max_model_steps(max_model_steps);
        (params, issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_to_params() {
        let config = FileExecutionConfig {
            call_timeout_seconds: Some(15),
            max_model_steps: 4,
        };
        let (params, issues) = config.to_params();
        assert_eq!(params.call_timeout, Some(Duration::from_secs(15)));
        assert_eq!(params.max_model_steps, 4);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_zero_timeout_disables() {
        let config = FileExecutionConfig {
            call_timeout_seconds: Some(0),
            ..Default::default()
        };
        let (params, issues) = config.to_params();
        assert!(params.call_timeout.is_none());
        assert_eq!(issues[0].code, ConfigIssueCode::ZeroCallTimeout);
    }
}
