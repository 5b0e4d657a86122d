//! Call domain entities: planned calls, plans and audit records

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// A single proposed call, as emitted by an upstream planner.
///
/// Arguments are untyped strings at this layer; `None` models an explicit
/// JSON `null`. Numbers and booleans are accepted on input and kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedCall {
    pub plugin_name: String,
    pub function_name: String,
    #[serde(default, deserialize_with = "deserialize_arguments")]
    pub arguments: BTreeMap<String, Option<String>>,
}

impl PlannedCall {
    pub fn new(plugin_name: impl Into<String>, function_name: impl Into<String>) -> Self {
        Self {
            plugin_name: plugin_name.into(),
            function_name: function_name.into(),
            arguments: BTreeMap::new(),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.arguments.insert(key.into(), Some(value.into()));
        self
    }

    pub fn with_null_arg(mut self, key: impl Into<String>) -> Self {
        self.arguments.insert(key.into(), None);
        self
    }

    /// Argument value by name (case-insensitive); `None` for absent or null.
    ///
    /// When keys differ only in case, the first non-blank value wins, the same
    /// rule [`PlannedCall::normalized`] applies.
    pub fn argument(&self, key: &str) -> Option<&str> {
        let mut first = None;
        for (_, value) in self.arguments.iter().filter(|(k, _)| k.eq_ignore_ascii_case(key)) {
            if !is_blank(value) {
                return value.as_deref();
            }
            first.get_or_insert(value.as_deref());
        }
        first.flatten()
    }

    /// Whether the argument is present with a non-blank value
    pub fn has_value(&self, key: &str) -> bool {
        self.argument(key).is_some_and(|v| !v.trim().is_empty())
    }

    /// `plugin.function`, lowercased - identity used by repetition tracking
    pub fn key(&self) -> String {
        call_key(&self.plugin_name, &self.function_name)
    }

    /// Copy of this call with argument keys lowercased.
    ///
    /// Keys that collide after lowercasing keep the first non-blank value.
    pub fn normalized(&self) -> Self {
        let mut arguments: BTreeMap<String, Option<String>> = BTreeMap::new();
        for (key, value) in &self.arguments {
            match arguments.entry(key.to_lowercase()) {
                Entry::Vacant(slot) => {
                    slot.insert(value.clone());
                }
                Entry::Occupied(mut slot) => {
                    if is_blank(slot.get()) && !is_blank(value) {
                        slot.insert(value.clone());
                    }
                }
            }
        }

        Self {
            plugin_name: self.plugin_name.clone(),
            function_name: self.function_name.clone(),
            arguments,
        }
    }

    /// Arguments serialized as compact JSON, for the audit record
    pub fn arguments_json(&self) -> String {
        serde_json::to_string(&self.arguments).unwrap_or_else(|_| "{}".to_string())
    }
}

fn deserialize_arguments<'de, D>(deserializer: D) -> Result<BTreeMap<String, Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .iter()
        .map(|(key, value)| (key.clone(), json_value_to_string(value)))
        .collect())
}

/// Stringify a JSON argument; `null` stays absent
pub(crate) fn json_value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

/// Identity of a call for repetition tracking: `plugin.function`, lowercased
pub fn call_key(plugin_name: &str, function_name: &str) -> String {
    format!(
        "{}.{}",
        plugin_name.trim().to_lowercase(),
        function_name.trim().to_lowercase()
    )
}

/// An ordered batch of proposed calls.
///
/// Order is significant: repetition and create-then-undo policies depend on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(rename = "toolCalls", default)]
    pub tool_calls: Vec<PlannedCall>,
}

impl Plan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_calls(calls: impl IntoIterator<Item = PlannedCall>) -> Self {
        Self {
            tool_calls: calls.into_iter().collect(),
        }
    }

    pub fn with_call(mut self, call: PlannedCall) -> Self {
        self.tool_calls.push(call);
        self
    }

    pub fn len(&self) -> usize {
        self.tool_calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tool_calls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlannedCall> {
        self.tool_calls.iter()
    }
}

/// Audit record for one proposed call - blocked, failed or executed.
///
/// Every proposed call yields exactly one of these downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallResult {
    pub plugin_name: String,
    pub function_name: String,
    /// Arguments serialized as JSON
    pub arguments: String,
    /// Normalised text result (empty for failures and unit results)
    pub result: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Wall-clock time spent in the callable, for calls that ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl CallResult {
    /// Successful execution
    pub fn success(call: &PlannedCall, result: impl Into<String>) -> Self {
        Self {
            plugin_name: call.plugin_name.clone(),
            function_name: call.function_name.clone(),
            arguments: call.arguments_json(),
            result: result.into(),
            success: true,
            error_message: None,
            duration_ms: None,
        }
    }

    /// Failed execution or blocked call
    pub fn failure(call: &PlannedCall, error: impl Into<String>) -> Self {
        Self {
            plugin_name: call.plugin_name.clone(),
            function_name: call.function_name.clone(),
            arguments: call.arguments_json(),
            result: String::new(),
            success: false,
            error_message: Some(error.into()),
            duration_ms: None,
        }
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn error(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Human-readable line for the "actions taken" summary
    pub fn summary_line(&self) -> String {
        if self.success {
            format!("{}.{}: {}", self.plugin_name, self.function_name, self.result)
        } else {
            format!(
                "{}.{}: Failed - {}",
                self.plugin_name,
                self.function_name,
                self.error_message.as_deref().unwrap_or("Unknown error")
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_lookup_is_case_insensitive() {
        let call = PlannedCall::new("ToDos", "delete_todo")
            .with_arg("TodoId", "todo-1")
            .with_null_arg("reason");

        assert_eq!(call.argument("todoid"), Some("todo-1"));
        assert_eq!(call.argument("TODOID"), Some("todo-1"));
        assert_eq!(call.argument("reason"), None);
        assert!(!call.has_value("reason"));
        assert!(call.has_value("todoId"));
    }

    #[test]
    fn test_blank_value_is_not_present() {
        let call = PlannedCall::new("ToDos", "create_todo").with_arg("description", "   ");
        assert!(!call.has_value("description"));
    }

    #[test]
    fn test_key_ignores_case() {
        let a = PlannedCall::new("ToDos", "Create_Todo");
        let b = PlannedCall::new("todos", "create_todo");
        assert_eq!(a.key(), b.key());
        assert_eq!(a.key(), "todos.create_todo");
    }

    #[test]
    fn test_normalized_lowercases_keys() {
        let call = PlannedCall::new("ToDos", "create_todo").with_arg("Description", "Buy milk");
        let normalized = call.normalized();
        assert_eq!(
            normalized.arguments.get("description"),
            Some(&Some("Buy milk".to_string()))
        );
    }

    #[test]
    fn test_duplicate_keys_resolve_to_first_non_blank() {
        let call = PlannedCall::new("ToDos", "create_todo")
            .with_arg("Description", "Buy milk")
            .with_arg("description", "  ");

        assert_eq!(call.argument("description"), Some("Buy milk"));
        assert_eq!(call.normalized().argument("description"), Some("Buy milk"));

        let call = PlannedCall::new("ToDos", "create_todo")
            .with_null_arg("DESCRIPTION")
            .with_arg("description", "Buy eggs");
        assert_eq!(call.argument("description"), Some("Buy eggs"));
        assert_eq!(
            call.normalized().arguments.get("description"),
            Some(&Some("Buy eggs".to_string()))
        );
    }

    #[test]
    fn test_deserialize_stringifies_scalar_arguments() {
        let call: PlannedCall = serde_json::from_str(
            r#"{"pluginName": "Reminders", "functionName": "create_reminder",
                "arguments": {"message": "Stretch", "minutesFromNow": 30, "urgent": true, "note": null}}"#,
        )
        .unwrap();

        assert_eq!(call.argument("minutesFromNow"), Some("30"));
        assert_eq!(call.argument("urgent"), Some("true"));
        assert_eq!(call.argument("note"), None);
        assert!(call.arguments.contains_key("note"));

        let bare: PlannedCall =
            serde_json::from_str(r#"{"pluginName": "ToDos", "functionName": "list_todos", "arguments": null}"#)
                .unwrap();
        assert!(bare.arguments.is_empty());
    }

    #[test]
    fn test_summary_lines() {
        let call = PlannedCall::new("ToDos", "create_todo").with_arg("description", "Buy milk");

        let ok = CallResult::success(&call, "Created todo-1");
        assert_eq!(ok.summary_line(), "ToDos.create_todo: Created todo-1");

        let failed = CallResult::failure(&call, "store unavailable");
        assert_eq!(
            failed.summary_line(),
            "ToDos.create_todo: Failed - store unavailable"
        );
        assert_eq!(failed.arguments, r#"{"description":"Buy milk"}"#);
    }

    #[test]
    fn test_call_result_serializes_camel_case() {
        let call = PlannedCall::new("Settings", "get_timezone");
        let json = serde_json::to_value(CallResult::success(&call, "UTC").with_duration(4)).unwrap();

        assert_eq!(json["pluginName"], "Settings");
        assert_eq!(json["functionName"], "get_timezone");
        assert_eq!(json["durationMs"], 4);
        assert!(json.get("errorMessage").is_none());
    }
}
