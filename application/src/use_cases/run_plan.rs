//! Run Plan use case
//!
//! Plan mode end to end:
//!
//! | Step | Component | Output |
//! |------|-----------|--------|
//! | 1. Validate | [`PlanValidator`] | approved / blocked partition |
//! | 2. Execute | [`CallExecutor`] | one result per approved call (skipped on dry run) |
//! | 3. Merge | this module | audit trail in plan order |
//! | 4. Record | [`AuditLogger`] | one event per result |
//! | 5. Summarize | [`render_summary`] | "actions taken" text |

use crate::config::ExecutionParams;
use crate::ports::audit_logger::{AuditEvent, AuditLogger, NoAuditLogger};
use crate::ports::progress::{GovernanceProgress, NoProgress};
use crate::use_cases::execute_calls::CallExecutor;
use crate::use_cases::shared::check_cancelled;
use callgate_domain::core::string::truncate;
use callgate_domain::{
    CallDecision, CallResult, CapabilityRegistry, ConversationMessage, DomainError,
    GovernancePolicy, Plan, PlanValidator, ValidationContext, ValidationOutcome, render_summary,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Result text recorded for approved calls on a dry run
pub const DRY_RUN_RESULT: &str = "approved (dry run, not executed)";

/// Input for one plan-mode request
#[derive(Debug, Clone, Default)]
pub struct RunPlanInput {
    pub plan: Plan,
    /// Recent conversation, newest last
    pub history: Vec<ConversationMessage>,
    /// Validate only; approved calls are reported but never invoked
    pub dry_run: bool,
}

impl RunPlanInput {
    pub fn new(plan: Plan) -> Self {
        Self {
            plan,
            ..Default::default()
        }
    }

    pub fn with_history(mut self, history: Vec<ConversationMessage>) -> Self {
        self.history = history;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Output of one plan-mode request
#[derive(Debug, Clone, Default)]
pub struct RunPlanOutput {
    /// Blocked and executed results, in plan order
    pub results: Vec<CallResult>,
    pub summary: String,
    pub approved_count: usize,
    pub blocked_count: usize,
    /// Execution stopped early because the request was cancelled
    pub cancelled: bool,
}

impl RunPlanOutput {
    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| !r.success).count()
    }
}

/// Use case for validating and executing a plan
pub struct RunPlanUseCase {
    registry: CapabilityRegistry,
    validator: PlanValidator,
    executor: CallExecutor,
    audit_logger: Arc<dyn AuditLogger>,
    cancellation_token: Option<CancellationToken>,
}

impl RunPlanUseCase {
    pub fn new(registry: CapabilityRegistry, policy: GovernancePolicy, params: ExecutionParams) -> Self {
        Self {
            registry,
            validator: PlanValidator::new(policy),
            executor: CallExecutor::new(params),
            audit_logger: Arc::new(NoAuditLogger),
            cancellation_token: None,
        }
    }

    /// Replace the validator (e.g. to add safety rules)
    pub fn with_validator(mut self, validator: PlanValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_audit_logger(mut self, logger: Arc<dyn AuditLogger>) -> Self {
        self.audit_logger = logger;
        self
    }

    /// Set a cancellation token for graceful interruption
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Run the plan without progress reporting
    pub async fn execute(&self, input: RunPlanInput) -> Result<RunPlanOutput, DomainError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Run the plan with progress callbacks.
    ///
    /// Fails only when cancelled before validation; everything else is
    /// reported through the returned results.
    pub async fn execute_with_progress(
        &self,
        input: RunPlanInput,
        progress: &dyn GovernanceProgress,
    ) -> Result<RunPlanOutput, DomainError> {
        check_cancelled(&self.cancellation_token)?;

        info!(
            calls = input.plan.len(),
            dry_run = input.dry_run,
            "Validating plan"
        );

        let context = ValidationContext::new(&self.registry).with_messages(&input.history);
        let outcome = self.validator.validate(&input.plan, &context);
        self.log_decisions(&input.plan, &outcome);

        let approved_count = outcome.approved.len();
        let blocked_count = outcome.blocked.len();
        self.audit_logger.log(AuditEvent::plan_validated(
            input.plan.len(),
            approved_count,
            blocked_count,
            input.dry_run,
        ));
        progress.on_validation_complete(approved_count, blocked_count);

        let ValidationOutcome {
            approved,
            blocked,
            decisions,
        } = outcome;

        let token = self.cancellation_token.clone().unwrap_or_default();
        let executed = if input.dry_run {
            approved
                .iter()
                .map(|call| CallResult::success(call, DRY_RUN_RESULT))
                .collect()
        } else {
            self.executor
                .execute_all_with_progress(&approved, &self.registry, &token, progress)
                .await
        };

        let results = merge_in_plan_order(&decisions, executed, blocked);
        for result in &results {
            self.audit_logger.log(AuditEvent::call_result("plan", result));
        }

        let cancelled = token.is_cancelled();
        if cancelled {
            warn!(
                produced = results.len(),
                planned = input.plan.len(),
                "Plan execution cancelled"
            );
        }

        let summary = render_summary(&results);
        info!(
            approved = approved_count,
            blocked = blocked_count,
            "Plan finished"
        );

        Ok(RunPlanOutput {
            results,
            summary,
            approved_count,
            blocked_count,
            cancelled,
        })
    }

    fn log_decisions(&self, plan: &Plan, outcome: &ValidationOutcome) {
        let mut blocked = outcome.blocked.iter();
        for (call, decision) in plan.iter().zip(&outcome.decisions) {
            match decision {
                CallDecision::Approved => debug!(
                    plugin = %call.plugin_name,
                    function = %call.function_name,
                    arguments = %truncate(&call.arguments_json(), 200),
                    "Call approved"
                ),
                CallDecision::Blocked => {
                    let reason = blocked
                        .next()
                        .and_then(|r| r.error())
                        .unwrap_or_default();
                    warn!(
                        plugin = %call.plugin_name,
                        function = %call.function_name,
                        reason,
                        "Call blocked"
                    );
                }
            }
        }
    }
}

/// Interleave executed and blocked results back into plan order.
///
/// Approved calls that never ran (cancellation) have no entry.
fn merge_in_plan_order(
    decisions: &[CallDecision],
    executed: Vec<CallResult>,
    blocked: Vec<CallResult>,
) -> Vec<CallResult> {
    let mut executed = executed.into_iter();
    let mut blocked = blocked.into_iter();

    decisions
        .iter()
        .filter_map(|decision| match decision {
            CallDecision::Approved => executed.next(),
            CallDecision::Blocked => blocked.next(),
        })
        .collect()
}
