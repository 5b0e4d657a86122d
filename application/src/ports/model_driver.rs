//! Model driver port
//!
//! Defines how the auto-invoke loop asks a model for its next move. The
//! model transport itself (prompting, streaming, function-calling wire
//! formats) lives behind this port.

use async_trait::async_trait;
use callgate_domain::PlannedCall;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while asking the model for a step
#[derive(Error, Debug)]
pub enum DriverError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid step: {0}")]
    InvalidStep(String),
}

/// What the model wants to do next
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ModelStep {
    /// Invoke one function and observe its result
    Call(PlannedCall),
    /// Stop calling functions and answer
    Respond { content: String },
}

/// Result of one function call as the model sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub call: PlannedCall,
    /// Function result, or the error text for failures
    pub output: String,
    pub success: bool,
}

/// Everything the model has seen so far in one auto-invoke request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    pub request: String,
    pub observations: Vec<Observation>,
}

impl Transcript {
    pub fn new(request: impl Into<String>) -> Self {
        Self {
            request: request.into(),
            observations: Vec::new(),
        }
    }

    pub fn observe(&mut self, call: PlannedCall, output: impl Into<String>, success: bool) {
        self.observations.push(Observation {
            call,
            output: output.into(),
            success,
        });
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// Source of model steps for the auto-invoke loop
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ModelDriver: Send + Sync {
    async fn next_step(&self, transcript: &Transcript) -> Result<ModelStep, DriverError>;
}
