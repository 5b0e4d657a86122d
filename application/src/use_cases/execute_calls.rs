//! Call executor
//!
//! Runs approved calls one at a time and turns every outcome into a
//! [`CallResult`]. Nothing raised by a plugin escapes this module.
//!
//! ```text
//! PlannedCall ─▶ resolve ─▶ coerce ─▶ invoke ─▶ CallResult
//!                  │          │         │
//!                  └──────────┴─────────┴──▶ failed CallResult
//! ```
//!
//! The next call starts only after the previous one finished; create-then-undo
//! and repetition policies depend on that ordering.

use crate::config::ExecutionParams;
use crate::ports::progress::{GovernanceProgress, NoProgress};
use crate::use_cases::shared::elapsed_ms;
use callgate_domain::{CallResult, CapabilityRegistry, PlannedCall, coerce_arguments, resolve};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Why an invocation did not run to completion
enum Interrupted {
    Cancelled,
    TimedOut(Duration),
}

/// Sequential executor for approved calls
#[derive(Debug, Clone, Default)]
pub struct CallExecutor {
    params: ExecutionParams,
}

impl CallExecutor {
    pub fn new(params: ExecutionParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ExecutionParams {
        &self.params
    }

    /// Execute all calls without progress reporting
    pub async fn execute_all(
        &self,
        calls: &[PlannedCall],
        registry: &CapabilityRegistry,
        cancellation: &CancellationToken,
    ) -> Vec<CallResult> {
        self.execute_all_with_progress(calls, registry, cancellation, &NoProgress)
            .await
    }

    /// Execute calls in order with progress callbacks.
    ///
    /// Stops before the next call once `cancellation` fires; results already
    /// produced are returned and nothing is rolled back.
    pub async fn execute_all_with_progress(
        &self,
        calls: &[PlannedCall],
        registry: &CapabilityRegistry,
        cancellation: &CancellationToken,
        progress: &dyn GovernanceProgress,
    ) -> Vec<CallResult> {
        let mut results = Vec::with_capacity(calls.len());

        for call in calls {
            if cancellation.is_cancelled() {
                info!(
                    remaining = calls.len() - results.len(),
                    "Execution cancelled, skipping remaining calls"
                );
                break;
            }

            progress.on_call_start(call);
            let result = self.execute_one(call, registry, cancellation).await;
            progress.on_call_complete(&result);
            results.push(result);
        }

        results
    }

    /// Resolve, coerce and invoke a single call.
    ///
    /// Always yields exactly one [`CallResult`].
    pub async fn execute_one(
        &self,
        call: &PlannedCall,
        registry: &CapabilityRegistry,
        cancellation: &CancellationToken,
    ) -> CallResult {
        let start = Instant::now();

        let resolved = match resolve(registry, &call.plugin_name, &call.function_name) {
            Ok(resolved) => resolved,
            Err(e) => return Self::failed(call, e.to_string()),
        };

        let args = match coerce_arguments(resolved.function.descriptor(), call, cancellation) {
            Ok(args) => args,
            Err(e) => return Self::failed(call, e.to_string()),
        };

        // The invoker runs inside the future so a panicking sync body is caught too.
        let function = resolved.function;
        let invocation = AssertUnwindSafe(async move { function.invoke(args).await }).catch_unwind();

        let run = async {
            match self.params.call_timeout {
                Some(limit) => tokio::time::timeout(limit, invocation)
                    .await
                    .map_err(|_| Interrupted::TimedOut(limit)),
                None => Ok(invocation.await),
            }
        };

        let outcome = tokio::select! {
            biased;
            _ = cancellation.cancelled() => Err(Interrupted::Cancelled),
            outcome = run => outcome,
        };

        let result = match outcome {
            Ok(Ok(Ok(output))) => CallResult::success(call, output.into_text()),
            Ok(Ok(Err(e))) => CallResult::failure(call, e.to_string()),
            Ok(Err(panic)) => CallResult::failure(call, panic_message(&*panic)),
            Err(Interrupted::Cancelled) => CallResult::failure(call, "call cancelled"),
            Err(Interrupted::TimedOut(limit)) => {
                CallResult::failure(call, format!("call timed out after {:?}", limit))
            }
        };
        let result = result.with_duration(elapsed_ms(start));

        if result.success {
            debug!(
                plugin = %call.plugin_name,
                function = %call.function_name,
                duration_ms = result.duration_ms,
                "Call succeeded"
            );
        } else {
            warn!(
                plugin = %call.plugin_name,
                function = %call.function_name,
                reason = result.error().unwrap_or_default(),
                "Call failed"
            );
        }

        result
    }

    fn failed(call: &PlannedCall, message: String) -> CallResult {
        warn!(
            plugin = %call.plugin_name,
            function = %call.function_name,
            reason = %message,
            "Call could not be prepared"
        );
        CallResult::failure(call, message)
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "function panicked".to_string()
    }
}
