//! Auto-invoke use case
//!
//! The model calls functions one at a time from inside its own reasoning
//! loop. Every proposed call passes through the [`InvocationLoopGuard`]:
//!
//! ```text
//!            ┌───────────────────────────────────────────┐
//!            ▼                                           │
//! ModelDriver::next_step ──▶ Call ──▶ guard ──▶ Proceed ─┤ execute, observe
//!            │                          ├────▶ Blocked ─┘ synthetic failure, observe
//!            │                          └────▶ Terminate ──▶ success, empty content
//!            └──▶ Respond ──▶ success, model content
//! ```
//!
//! A terminated loop is an expected stop, not an error: the caller gets a
//! successful output with empty content and the results collected so far.

use crate::config::ExecutionParams;
use crate::ports::audit_logger::{AuditEvent, AuditLogger, NoAuditLogger};
use crate::ports::model_driver::{DriverError, ModelDriver, ModelStep, Transcript};
use crate::ports::progress::{GovernanceProgress, NoProgress};
use crate::use_cases::execute_calls::CallExecutor;
use callgate_domain::{
    CallResult, CapabilityRegistry, GovernancePolicy, GuardVerdict, InvocationLoopGuard,
    PlannedCall,
};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that abort an auto-invoke request
#[derive(Error, Debug)]
pub enum AutoInvokeError {
    #[error("Model driver error: {0}")]
    Driver(#[from] DriverError),

    /// Carries every result produced before the interruption
    #[error("Operation cancelled after {} call(s)", .results.len())]
    Cancelled { results: Vec<CallResult> },
}

impl AutoInvokeError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AutoInvokeError::Cancelled { .. })
    }

    /// Results collected before the loop stopped; empty for driver errors
    pub fn partial_results(&self) -> &[CallResult] {
        match self {
            AutoInvokeError::Cancelled { results } => results,
            AutoInvokeError::Driver(_) => &[],
        }
    }
}

/// Input for one auto-invoke request
#[derive(Debug, Clone, Default)]
pub struct AutoInvokeInput {
    pub request: String,
}

impl AutoInvokeInput {
    pub fn new(request: impl Into<String>) -> Self {
        Self {
            request: request.into(),
        }
    }
}

/// Output of one auto-invoke request
#[derive(Debug, Clone, Default)]
pub struct AutoInvokeOutput {
    /// Always true for a returned output; failures are `Err(AutoInvokeError)`
    pub success: bool,
    /// Model's final answer; empty when the loop was terminated
    pub content: String,
    /// Every call the model proposed, in order
    pub results: Vec<CallResult>,
    /// Why the loop was stopped, when it did not end with a model response
    pub terminated: Option<String>,
}

impl AutoInvokeOutput {
    fn responded(content: String, results: Vec<CallResult>) -> Self {
        Self {
            success: true,
            content,
            results,
            terminated: None,
        }
    }

    fn terminated(reason: String, results: Vec<CallResult>) -> Self {
        Self {
            success: true,
            content: String::new(),
            results,
            terminated: Some(reason),
        }
    }

    pub fn was_terminated(&self) -> bool {
        self.terminated.is_some()
    }
}

/// What the loop does after one guarded call
enum LoopControl {
    Continue,
    Aborted { reason: String },
}

/// Use case for guarded autonomous invocation
pub struct AutoInvokeUseCase<D: ModelDriver + 'static> {
    driver: Arc<D>,
    registry: CapabilityRegistry,
    policy: GovernancePolicy,
    executor: CallExecutor,
    audit_logger: Arc<dyn AuditLogger>,
    cancellation_token: Option<CancellationToken>,
}

impl<D: ModelDriver + 'static> AutoInvokeUseCase<D> {
    pub fn new(
        driver: Arc<D>,
        registry: CapabilityRegistry,
        policy: GovernancePolicy,
        params: ExecutionParams,
    ) -> Self {
        Self {
            driver,
            registry,
            policy,
            executor: CallExecutor::new(params),
            audit_logger: Arc::new(NoAuditLogger),
            cancellation_token: None,
        }
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

    /// Run the loop without progress reporting
    pub async fn execute(&self, input: AutoInvokeInput) -> Result<AutoInvokeOutput, AutoInvokeError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Run the loop with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: AutoInvokeInput,
        progress: &dyn GovernanceProgress,
    ) -> Result<AutoInvokeOutput, AutoInvokeError> {
        let token = self.cancellation_token.clone().unwrap_or_default();
        let max_steps = self.executor.params().max_model_steps;
        let mut guard = InvocationLoopGuard::new(&self.policy);
        let mut transcript = Transcript::new(input.request);
        let mut results = Vec::new();

        info!(max_steps, "Starting auto-invoke loop");

        for step_index in 0..max_steps {
            if token.is_cancelled() {
                return Err(self.cancelled(results));
            }

            let step = tokio::select! {
                biased;
                _ = token.cancelled() => return Err(self.cancelled(results)),
                step = self.driver.next_step(&transcript) => step?,
            };

            match step {
                ModelStep::Respond { content } => {
                    info!(steps = step_index + 1, calls = results.len(), "Model responded");
                    self.audit_logger
                        .log(AuditEvent::response_generated(&content, results.len()));
                    return Ok(AutoInvokeOutput::responded(content, results));
                }
                ModelStep::Call(call) => {
                    let control = self
                        .invoke_guarded(
                            call,
                            &mut guard,
                            &mut transcript,
                            &mut results,
                            &token,
                            progress,
                        )
                        .await;
                    if let LoopControl::Aborted { reason } = control {
                        return Ok(self.terminate(reason, results, progress));
                    }
                }
            }
        }

        let reason = format!("model step limit ({}) reached", max_steps);
        Ok(self.terminate(reason, results, progress))
    }

    /// Screen one call through the guard and run it if allowed
    async fn invoke_guarded(
        &self,
        call: PlannedCall,
        guard: &mut InvocationLoopGuard,
        transcript: &mut Transcript,
        results: &mut Vec<CallResult>,
        token: &CancellationToken,
        progress: &dyn GovernanceProgress,
    ) -> LoopControl {
        let result = match guard.check(&call.plugin_name, &call.function_name) {
            GuardVerdict::Terminate { reason } => return LoopControl::Aborted { reason },
            GuardVerdict::Blocked { message } => {
                warn!(
                    plugin = %call.plugin_name,
                    function = %call.function_name,
                    reason = %message,
                    "Call blocked by loop guard"
                );
                CallResult::failure(&call, message)
            }
            GuardVerdict::Proceed => {
                debug!(
                    plugin = %call.plugin_name,
                    function = %call.function_name,
                    count = guard.count(),
                    "Call allowed by loop guard"
                );
                progress.on_call_start(&call);
                let result = self.executor.execute_one(&call, &self.registry, token).await;
                progress.on_call_complete(&result);
                result
            }
        };

        let output = if result.success {
            result.result.clone()
        } else {
            result.error().unwrap_or_default().to_string()
        };
        self.audit_logger
            .log(AuditEvent::call_result("auto_invoke", &result));
        transcript.observe(call, output, result.success);
        results.push(result);

        LoopControl::Continue
    }

    fn cancelled(&self, results: Vec<CallResult>) -> AutoInvokeError {
        info!(calls = results.len(), "Auto-invoke loop cancelled");
        AutoInvokeError::Cancelled { results }
    }

    fn terminate(
        &self,
        reason: String,
        results: Vec<CallResult>,
        progress: &dyn GovernanceProgress,
    ) -> AutoInvokeOutput {
        warn!(reason = %reason, calls = results.len(), "Auto-invoke loop terminated");
        self.audit_logger
            .log(AuditEvent::loop_terminated(&reason, results.len()));
        progress.on_loop_terminated(&reason);
        AutoInvokeOutput::terminated(reason, results)
    }
}
