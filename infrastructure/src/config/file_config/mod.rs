//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into domain / application
//! types, collecting [`ConfigIssue`]s along the way.

mod audit;
mod execution;
mod governance;
mod logging;
mod output;

pub use audit::FileAuditConfig;
pub use execution::FileExecutionConfig;
pub use governance::FileGovernanceConfig;
pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;

use callgate_application::GovernanceConfig;
use callgate_domain::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Governance limits and keywords
    pub governance: FileGovernanceConfig,
    /// Call timeout and auto-invoke step limit
    pub execution: FileExecutionConfig,
    /// JSONL audit log
    pub audit: FileAuditConfig,
    /// Diagnostic log files
    pub logging: FileLoggingConfig,
    /// CLI output preferences
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        self.to_governance_config().1
    }

    /// Build the runtime configuration; invalid values are replaced by defaults
    /// and reported as issues.
    pub fn to_governance_config(&self) -> (GovernanceConfig, Vec<ConfigIssue>) {
        let (policy, mut issues) = self.governance.to_policy();
        let (execution, execution_issues) = self.execution.to_params();
        issues.extend(execution_issues);
        (GovernanceConfig::new(policy, execution), issues)
    }
}
