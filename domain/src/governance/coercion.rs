//! Argument coercion: untyped planner strings to native parameter values.
//!
//! Conversion table:
//!
//! | Kind | Accepted input | Absent / blank |
//! |------|----------------|----------------|
//! | `Text` | any string, passed through | default or `""` |
//! | `Integer` | `i64` after trimming | default or `0` |
//! | `Float` | `f64` after trimming | default or `0.0` |
//! | `Boolean` | `true/false/yes/no/on/off/1/0` | default or `false` |
//! | `Enum` | a declared variant, any case | default or first variant |
//! | `Optional(T)` | coerced as `T` | default or `Null` |
//! | `Cancellation` | never read from arguments | live token |
//!
//! Failures form the closed [`CoercionError`] set.

use crate::call::entities::PlannedCall;
use crate::plugin::entities::{FunctionDescriptor, ParamKind, ParameterSpec};
use crate::plugin::function::{ArgValue, InvocationArgs};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Why an argument string could not be converted
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoercionError {
    #[error("Argument '{name}' expects an integer, got '{value}'")]
    InvalidInteger { name: String, value: String },

    #[error("Argument '{name}' expects a number, got '{value}'")]
    InvalidFloat { name: String, value: String },

    #[error("Argument '{name}' expects true or false, got '{value}'")]
    InvalidBoolean { name: String, value: String },

    #[error("Argument '{name}' must be one of [{}], got '{value}'", .allowed.join(", "))]
    InvalidVariant {
        name: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("Parameter '{name}' declares an enum without variants")]
    EmptyEnum { name: String },
}

/// Coerce every declared parameter of `descriptor` from the call's arguments.
///
/// Arguments are matched to parameters case-insensitively; arguments the
/// function does not declare are ignored.
pub fn coerce_arguments(
    descriptor: &FunctionDescriptor,
    call: &PlannedCall,
    cancellation: &CancellationToken,
) -> Result<InvocationArgs, CoercionError> {
    let mut args = InvocationArgs::new();
    for param in &descriptor.parameters {
        let value = match param.kind {
            ParamKind::Cancellation => ArgValue::Cancellation(cancellation.clone()),
            _ => coerce_parameter(param, call.argument(&param.name))?,
        };
        args.push(param.name.clone(), value);
    }
    Ok(args)
}

/// Coerce one parameter, falling back to its default, then to the kind's zero value.
pub fn coerce_parameter(param: &ParameterSpec, raw: Option<&str>) -> Result<ArgValue, CoercionError> {
    let supplied = raw.filter(|v| !v.trim().is_empty());
    let fallback = param.default.as_deref().filter(|v| !v.trim().is_empty());

    match supplied.or(fallback) {
        Some(value) => coerce_value(&param.name, &param.kind, value),
        None => zero_value(&param.name, &param.kind),
    }
}

/// Convert a non-blank string to the given kind
pub fn coerce_value(name: &str, kind: &ParamKind, value: &str) -> Result<ArgValue, CoercionError> {
    match kind {
        ParamKind::Text => Ok(ArgValue::Text(value.to_string())),
        ParamKind::Integer => value
            .trim()
            .parse::<i64>()
            .map(ArgValue::Integer)
            .map_err(|_| CoercionError::InvalidInteger {
                name: name.to_string(),
                value: value.to_string(),
            }),
        ParamKind::Float => value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(ArgValue::Float)
            .ok_or_else(|| CoercionError::InvalidFloat {
                name: name.to_string(),
                value: value.to_string(),
            }),
        ParamKind::Boolean => parse_bool(value)
            .map(ArgValue::Boolean)
            .ok_or_else(|| CoercionError::InvalidBoolean {
                name: name.to_string(),
                value: value.to_string(),
            }),
        ParamKind::Enum(variants) => variants
            .iter()
            .find(|v| v.eq_ignore_ascii_case(value.trim()))
            .map(|v| ArgValue::Enum(v.clone()))
            .ok_or_else(|| CoercionError::InvalidVariant {
                name: name.to_string(),
                value: value.to_string(),
                allowed: variants.clone(),
            }),
        ParamKind::Optional(inner) => coerce_value(name, inner, value),
        ParamKind::Cancellation => Ok(ArgValue::Null),
    }
}

fn zero_value(name: &str, kind: &ParamKind) -> Result<ArgValue, CoercionError> {
    match kind {
        ParamKind::Text => Ok(ArgValue::Text(String::new())),
        ParamKind::Integer => Ok(ArgValue::Integer(0)),
        ParamKind::Float => Ok(ArgValue::Float(0.0)),
        ParamKind::Boolean => Ok(ArgValue::Boolean(false)),
        ParamKind::Enum(variants) => variants
            .first()
            .map(|v| ArgValue::Enum(v.clone()))
            .ok_or_else(|| CoercionError::EmptyEnum {
                name: name.to_string(),
            }),
        ParamKind::Optional(_) | ParamKind::Cancellation => Ok(ArgValue::Null),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "on" | "1" => Some(true),
        "false" | "no" | "n" | "off" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn integer(name: &str) -> ParameterSpec {
        ParameterSpec::new(name, ParamKind::Integer)
    }

    #[test]
    fn test_integer_coercion() {
        let value = coerce_parameter(&integer("minutes"), Some(" 30 ")).unwrap();
        assert!(matches!(value, ArgValue::Integer(30)));

        let err = coerce_parameter(&integer("minutes"), Some("soon")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Argument 'minutes' expects an integer, got 'soon'"
        );
    }

    #[test]
    fn test_blank_uses_default_then_zero() {
        let with_default = integer("limit").with_default("10");
        assert!(matches!(
            coerce_parameter(&with_default, Some("  ")).unwrap(),
            ArgValue::Integer(10)
        ));
        assert!(matches!(
            coerce_parameter(&integer("limit"), None).unwrap(),
            ArgValue::Integer(0)
        ));
    }

    #[test]
    fn test_boolean_spellings() {
        let param = ParameterSpec::new("flag", ParamKind::Boolean);
        for raw in ["true", "YES", "on", "1"] {
            assert!(matches!(
                coerce_parameter(&param, Some(raw)).unwrap(),
                ArgValue::Boolean(true)
            ));
        }
        for raw in ["false", "No", "off", "0"] {
            assert!(matches!(
                coerce_parameter(&param, Some(raw)).unwrap(),
                ArgValue::Boolean(false)
            ));
        }
        assert!(matches!(
            coerce_parameter(&param, Some("maybe")),
            Err(CoercionError::InvalidBoolean { .. })
        ));
    }

    #[test]
    fn test_enum_matches_case_insensitively_and_returns_canonical() {
        let param = ParameterSpec::new("unit", ParamKind::enumeration(["celsius", "fahrenheit"]));
        match coerce_parameter(&param, Some("Fahrenheit")).unwrap() {
            ArgValue::Enum(v) => assert_eq!(v, "fahrenheit"),
            other => panic!("unexpected {:?}", other),
        }

        let err = coerce_parameter(&param, Some("kelvin")).unwrap_err();
        assert!(err.to_string().contains("celsius, fahrenheit"));

        match coerce_parameter(&param, None).unwrap() {
            ArgValue::Enum(v) => assert_eq!(v, "celsius"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_empty_enum_zero_value_is_error() {
        let param = ParameterSpec::new("mode", ParamKind::Enum(vec![]));
        assert!(matches!(
            coerce_parameter(&param, None),
            Err(CoercionError::EmptyEnum { .. })
        ));
    }

    #[test]
    fn test_optional_wrapper() {
        let param = ParameterSpec::new("limit", ParamKind::optional(ParamKind::Integer));
        assert!(coerce_parameter(&param, None).unwrap().is_null());
        assert!(matches!(
            coerce_parameter(&param, Some("4")).unwrap(),
            ArgValue::Integer(4)
        ));
        assert!(coerce_parameter(&param, Some("four")).is_err());
    }

    #[test]
    fn test_float_rejects_non_finite() {
        let param = ParameterSpec::new("ratio", ParamKind::Float);
        assert!(matches!(
            coerce_parameter(&param, Some("0.5")).unwrap(),
            ArgValue::Float(v) if (v - 0.5).abs() < f64::EPSILON
        ));
        assert!(coerce_parameter(&param, Some("NaN")).is_err());
    }

    #[test]
    fn test_coerce_arguments_supplies_token_and_ignores_extras() {
        let descriptor = FunctionDescriptor::new("list_reminders", "List")
            .with_parameter(ParameterSpec::new(
                "Limit",
                ParamKind::optional(ParamKind::Integer),
            ))
            .with_parameter(ParameterSpec::cancellation());
        let call = PlannedCall::new("Reminders", "list_reminders")
            .with_arg("limit", "2")
            .with_arg("unexpected", "x");
        let token = CancellationToken::new();

        let args = coerce_arguments(&descriptor, &call, &token).unwrap();
        assert_eq!(args.len(), 2);
        assert_eq!(args.optional_integer("limit").unwrap(), Some(2));
        assert!(args.cancellation().is_some());
        assert!(args.get("unexpected").is_none());
    }

    #[test]
    fn test_text_passes_raw_string() {
        let param = ParameterSpec::text("description");
        match coerce_parameter(&param, Some("  Buy milk ")).unwrap() {
            ArgValue::Text(v) => assert_eq!(v, "  Buy milk "),
            other => panic!("unexpected {:?}", other),
        }
    }
}
