//! Plan parsing from planner output.
//!
//! The planner emits a JSON document:
//!
//! ```json
//! { "toolCalls": [ { "pluginName": "ToDos", "functionName": "create_todo",
//!                    "arguments": { "description": "Buy milk" } } ] }
//! ```
//!
//! Models wrap this in prose or fenced code blocks often enough that the
//! text entry point [`parse_plan`] accepts raw JSON or the first fenced
//! block that parses. Unknown fields are ignored and a missing `toolCalls`
//! array is an empty plan.

use super::entities::{Plan, PlannedCall, json_value_to_string};
use crate::core::error::DomainError;
use serde_json::Value;
use std::collections::BTreeMap;

/// Parse a plan from planner response text.
///
/// Supports two formats:
/// 1. Raw JSON (the entire response is a JSON object)
/// 2. ` ```json ` or bare ` ``` ` fenced code blocks containing JSON
pub fn parse_plan(response: &str) -> Result<Plan, DomainError> {
    let trimmed = response.trim();
    if trimmed.is_empty() {
        return Ok(Plan::new());
    }

    // Try parsing the entire response as JSON
    if let Ok(parsed) = serde_json::from_str::<Value>(trimmed) {
        return parse_plan_json(&parsed);
    }

    // Look for fenced blocks
    let mut in_block = false;
    let mut current_block = String::new();

    for line in response.lines() {
        let fence = line.trim();
        if !in_block && (fence == "```" || fence == "```json") {
            in_block = true;
            current_block.clear();
        } else if in_block && fence == "```" {
            in_block = false;
            if let Ok(parsed) = serde_json::from_str::<Value>(&current_block) {
                return parse_plan_json(&parsed);
            }
        } else if in_block {
            current_block.push_str(line);
            current_block.push('\n');
        }
    }

    Err(DomainError::InvalidPlan(
        "no JSON plan found in response".to_string(),
    ))
}

/// Parse a plan from a JSON value.
///
/// Returns an empty plan when `toolCalls` is missing; fails when the value
/// is not an object or `toolCalls` is not an array of objects.
pub fn parse_plan_json(json: &Value) -> Result<Plan, DomainError> {
    let object = json
        .as_object()
        .ok_or_else(|| DomainError::InvalidPlan("plan must be a JSON object".to_string()))?;

    let calls = match object.get("toolCalls") {
        None | Some(Value::Null) => return Ok(Plan::new()),
        Some(Value::Array(calls)) => calls,
        Some(_) => {
            return Err(DomainError::InvalidPlan(
                "toolCalls must be an array".to_string(),
            ));
        }
    };

    let mut plan = Plan::new();
    for (index, call_json) in calls.iter().enumerate() {
        let call = parse_planned_call(call_json)
            .map_err(|e| DomainError::InvalidPlan(format!("toolCalls[{}]: {}", index, e)))?;
        plan = plan.with_call(call);
    }

    Ok(plan)
}

/// Parse a single call object.
///
/// Missing names become empty strings so the resolver reports them with its
/// own error; non-string argument values are stringified.
pub fn parse_planned_call(json: &Value) -> Result<PlannedCall, String> {
    let object = json
        .as_object()
        .ok_or_else(|| "call must be a JSON object".to_string())?;

    let plugin_name = object
        .get("pluginName")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    let function_name = object
        .get("functionName")
        .and_then(|v| v.as_str())
        .unwrap_or("");

    let mut arguments = BTreeMap::new();
    match object.get("arguments") {
        None | Some(Value::Null) => {}
        Some(Value::Object(args)) => {
            for (key, value) in args {
                arguments.insert(key.clone(), json_value_to_string(value));
            }
        }
        Some(_) => return Err("arguments must be an object".to_string()),
    }

    Ok(PlannedCall {
        plugin_name: plugin_name.to_string(),
        function_name: function_name.to_string(),
        arguments,
    })
}
