//! Plugin domain entities: function descriptors and parameter schemas

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared type of a plugin function parameter.
///
/// This is the closed set of native types a planner-supplied string can be
/// coerced into (see [`crate::governance::coercion`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "of", rename_all = "snake_case")]
pub enum ParamKind {
    /// Untyped text - the raw argument string is passed through.
    Text,
    /// Signed 64-bit integer
    Integer,
    /// 64-bit float
    Float,
    /// Boolean (`true`/`false`, `yes`/`no`, `on`/`off`, `1`/`0`)
    Boolean,
    /// One of a fixed set of variants, matched case-insensitively
    Enum(Vec<String>),
    /// Nullable wrapper around another kind
    Optional(Box<ParamKind>),
    /// Implicit system parameter: receives the live cancellation token.
    /// Never supplied by the planner.
    Cancellation,
}

impl ParamKind {
    pub fn enumeration<I, S>(variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ParamKind::Enum(variants.into_iter().map(Into::into).collect())
    }

    pub fn optional(inner: ParamKind) -> Self {
        ParamKind::Optional(Box::new(inner))
    }

    /// Whether the parameter is filled in by the runtime rather than the caller
    pub fn is_implicit(&self) -> bool {
        matches!(self, ParamKind::Cancellation)
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, ParamKind::Optional(_))
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKind::Text => write!(f, "text"),
            ParamKind::Integer => write!(f, "integer"),
            ParamKind::Float => write!(f, "float"),
            ParamKind::Boolean => write!(f, "boolean"),
            ParamKind::Enum(variants) => write!(f, "enum[{}]", variants.join("|")),
            ParamKind::Optional(inner) => write!(f, "{}?", inner),
            ParamKind::Cancellation => write!(f, "cancellation"),
        }
    }
}

/// Parameter specification for a plugin function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Parameter name as declared by the plugin (matched case-insensitively)
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Declared native type
    pub kind: ParamKind,
    /// Default value (raw string, coerced like a supplied argument)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            kind,
            default: None,
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Text)
    }

    /// The implicit cancellation parameter
    pub fn cancellation() -> Self {
        Self::new("cancellation", ParamKind::Cancellation)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// A parameter is required when the caller must supply a non-blank value:
    /// no default, not nullable, and not an implicit system parameter.
    pub fn is_required(&self) -> bool {
        !self.has_default() && !self.kind.is_optional() && !self.kind.is_implicit()
    }
}

/// Introspectable metadata of a single plugin function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDescriptor {
    /// Declared function name (e.g., "create_todo")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Parameters in declaration order
    pub parameters: Vec<ParameterSpec>,
}

impl FunctionDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, param: ParameterSpec) -> Self {
        self.parameters.push(param);
        self
    }

    /// Parameters the caller must supply
    pub fn required_parameters(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.parameters.iter().filter(|p| p.is_required())
    }

    /// Look up a parameter by name (case-insensitive)
    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// One-line signature, e.g. `create_todo(description: text, priority: enum[low|high] = low)`.
    ///
    /// Implicit parameters are omitted.
    pub fn signature(&self) -> String {
        let params: Vec<String> = self
            .parameters
            .iter()
            .filter(|p| !p.kind.is_implicit())
            .map(|p| match &p.default {
                Some(default) => format!("{}: {} = {}", p.name, p.kind, default),
                None => format!("{}: {}", p.name, p.kind),
            })
            .collect();
        format!("{}({})", self.name, params.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_parameters() {
        let descriptor = FunctionDescriptor::new("create_todo", "Create a todo")
            .with_parameter(ParameterSpec::text("description"))
            .with_parameter(
                ParameterSpec::new("priority", ParamKind::enumeration(["low", "high"]))
                    .with_default("low"),
            )
            .with_parameter(ParameterSpec::new(
                "due",
                ParamKind::optional(ParamKind::Integer),
            ))
            .with_parameter(ParameterSpec::cancellation());

        let required: Vec<&str> = descriptor
            .required_parameters()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(required, vec!["description"]);
    }

    #[test]
    fn test_parameter_lookup_is_case_insensitive() {
        let descriptor = FunctionDescriptor::new("delete_todo", "Delete")
            .with_parameter(ParameterSpec::text("todoId"));

        assert!(descriptor.parameter("TODOID").is_some());
        assert!(descriptor.parameter("todoid").is_some());
        assert!(descriptor.parameter("id").is_none());
    }

    #[test]
    fn test_signature_omits_implicit_parameters() {
        let descriptor = FunctionDescriptor::new("list_reminders", "List")
            .with_parameter(ParameterSpec::new(
                "limit",
                ParamKind::optional(ParamKind::Integer),
            ))
            .with_parameter(ParameterSpec::cancellation());

        assert_eq!(descriptor.signature(), "list_reminders(limit: integer?)");
    }

    #[test]
    fn test_signature_shows_defaults() {
        let descriptor = FunctionDescriptor::new("list_todos", "List").with_parameter(
            ParameterSpec::new("includeCompleted", ParamKind::Boolean).with_default("false"),
        );

        assert_eq!(
            descriptor.signature(),
            "list_todos(includeCompleted: boolean = false)"
        );
    }
}
