//! Governance configuration container.
//!
//! [`GovernanceConfig`] groups the domain [`GovernancePolicy`] with the
//! application-level [`ExecutionParams`] so the binary can hand a single
//! value to whatever use case it builds.
//!
//! | Type | RunPlan | AutoInvoke |
//! |------|---------|------------|
//! | `GovernancePolicy` | Yes (validator) | Yes (loop guard) |
//! | `ExecutionParams` | Yes | Yes |

use crate::config::ExecutionParams;
use callgate_domain::GovernancePolicy;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GovernanceConfig {
    policy: GovernancePolicy,
    execution: ExecutionParams,
}

impl GovernanceConfig {
    pub fn new(policy: GovernancePolicy, execution: ExecutionParams) -> Self {
        Self { policy, execution }
    }

    // ==================== Accessors ====================

    pub fn policy(&self) -> &GovernancePolicy {
        &self.policy
    }

    pub fn execution(&self) -> &ExecutionParams {
        &self.execution
    }

    // ==================== Builder Methods ====================

    pub fn with_policy(mut self, policy: GovernancePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_execution(mut self, execution: ExecutionParams) -> Self {
        self.execution = execution;
        self
    }
}
