//! Scripted model driver
//!
//! Replays a fixed sequence of model steps from a JSON script. Used by the
//! `replay` command to exercise the auto-invoke loop without a live model.
//!
//! ```json
//! {
//!   "request": "Remind me to stretch",
//!   "steps": [
//!     { "step": "call", "pluginName": "Reminders", "functionName": "create_reminder",
//!       "arguments": { "message": "Stretch", "minutesFromNow": "30" } },
//!     { "step": "respond", "content": "Reminder set." }
//!   ]
//! }
//! ```
//!
//! The step handed out is chosen by how many observations the transcript
//! already holds, so the driver itself keeps no state.

use async_trait::async_trait;
use callgate_application::{DriverError, ModelDriver, ModelStep, Transcript};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Failed to read script {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid script: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct Script {
    #[serde(default)]
    request: String,
    #[serde(default)]
    steps: Vec<ModelStep>,
}

#[derive(Debug, Clone)]
pub struct ScriptedModelDriver {
    request: String,
    steps: Vec<ModelStep>,
}

impl ScriptedModelDriver {
    pub fn new(request: impl Into<String>, steps: Vec<ModelStep>) -> Self {
        Self {
            request: request.into(),
            steps,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        let script: Script = serde_json::from_str(json)?;
        Ok(Self::new(script.request, script.steps))
    }

    pub fn from_file(path: &Path) -> Result<Self, ScriptError> {
        let content = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// The user request the script was recorded for
    pub fn request(&self) -> &str {
        &self.request
    }

    pub fn steps(&self) -> &[ModelStep] {
        &self.steps
    }
}

#[async_trait]
impl ModelDriver for ScriptedModelDriver {
    async fn next_step(&self, transcript: &Transcript) -> Result<ModelStep, DriverError> {
        match self.steps.get(transcript.len()) {
            Some(step) => Ok(step.clone()),
            None => {
                // A script without a closing respond step ends with an empty answer.
                debug!(steps = self.steps.len(), "Script exhausted");
                Ok(ModelStep::Respond {
                    content: String::new(),
                })
            }
        }
    }
}
