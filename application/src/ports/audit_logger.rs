//! Port for the structured audit trail.
//!
//! Defines the [`AuditLogger`] trait for recording governance events
//! (plan validation, every `CallResult`, loop termination) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the audit
//! trail in a machine-readable format (JSONL).

use callgate_domain::CallResult;
use serde_json::{Value, json};

/// A structured audit event.
///
/// Each event has a type string and a JSON payload containing
/// event-specific fields. Timestamps are added by the adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEvent {
    /// Event type identifier (e.g., "call_result", "plan_validated").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl AuditEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }

    /// One audit record per proposed call
    pub fn call_result(mode: &str, result: &CallResult) -> Self {
        let mut payload = serde_json::to_value(result).unwrap_or_default();
        if let Value::Object(map) = &mut payload {
            map.insert("mode".to_string(), Value::String(mode.to_string()));
        }
        Self::new("call_result", payload)
    }

    pub fn plan_validated(total: usize, approved: usize, blocked: usize, dry_run: bool) -> Self {
        Self::new(
            "plan_validated",
            json!({
                "total": total,
                "approved": approved,
                "blocked": blocked,
                "dry_run": dry_run,
            }),
        )
    }

    pub fn loop_terminated(reason: &str, calls: usize) -> Self {
        Self::new("loop_terminated", json!({ "reason": reason, "calls": calls }))
    }

    pub fn response_generated(content: &str, calls: usize) -> Self {
        Self::new(
            "response_generated",
            json!({ "bytes": content.len(), "calls": calls }),
        )
    }
}

/// Port for logging audit events.
///
/// Implementations write each event as a single record (e.g., one JSONL line).
/// `log` is synchronous and non-fallible; write failures are ignored by the
/// adapter.
pub trait AuditLogger: Send + Sync {
    fn log(&self, event: AuditEvent);
}

/// No-op implementation for tests and when auditing is disabled.
pub struct NoAuditLogger;

impl AuditLogger for NoAuditLogger {
    fn log(&self, _event: AuditEvent) {}
}
