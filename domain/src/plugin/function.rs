//! Callable plugin functions: descriptor plus invoker closure.
//!
//! A [`PluginFunction`] is one row of a plugin's registration table. The
//! invoker receives already-coerced [`InvocationArgs`] and produces an
//! [`InvocationOutput`]. Three shapes of callable are accepted and all
//! normalised to the same boxed future:
//!
//! | Constructor | Callable returns |
//! |-------------|------------------|
//! | [`PluginFunction::sync`] | text directly |
//! | [`PluginFunction::text`] | a future producing text |
//! | [`PluginFunction::unit`] | a future producing nothing |

use super::entities::FunctionDescriptor;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// A coerced argument value, ready to be consumed by an invoker
#[derive(Debug, Clone)]
pub enum ArgValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    /// Canonical enum variant (as declared, not as supplied)
    Enum(String),
    /// Absent value of an optional parameter
    Null,
    Cancellation(CancellationToken),
}

impl ArgValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ArgValue::Null)
    }
}

/// Error raised by a plugin function body (or by a typed argument accessor)
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct InvocationError {
    pub message: String,
}

impl InvocationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Value produced by a plugin function
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationOutput {
    Text(String),
    Unit,
}

impl InvocationOutput {
    /// Normalise to plain text; `Unit` becomes the empty string.
    pub fn into_text(self) -> String {
        match self {
            InvocationOutput::Text(text) => text,
            InvocationOutput::Unit => String::new(),
        }
    }
}

/// Arguments handed to an invoker, in parameter declaration order.
#[derive(Debug, Clone, Default)]
pub struct InvocationArgs {
    values: Vec<(String, ArgValue)>,
}

impl InvocationArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: ArgValue) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: ArgValue) {
        self.values.push((name.into(), value));
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Look up a value by parameter name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    pub fn text(&self, name: &str) -> Result<&str, InvocationError> {
        match self.get(name) {
            Some(ArgValue::Text(s)) | Some(ArgValue::Enum(s)) => Ok(s),
            _ => Err(Self::type_mismatch(name, "text")),
        }
    }

    pub fn integer(&self, name: &str) -> Result<i64, InvocationError> {
        match self.get(name) {
            Some(ArgValue::Integer(n)) => Ok(*n),
            _ => Err(Self::type_mismatch(name, "integer")),
        }
    }

    pub fn float(&self, name: &str) -> Result<f64, InvocationError> {
        match self.get(name) {
            Some(ArgValue::Float(n)) => Ok(*n),
            _ => Err(Self::type_mismatch(name, "float")),
        }
    }

    pub fn boolean(&self, name: &str) -> Result<bool, InvocationError> {
        match self.get(name) {
            Some(ArgValue::Boolean(b)) => Ok(*b),
            _ => Err(Self::type_mismatch(name, "boolean")),
        }
    }

    /// Optional integer: `Null` (or missing) yields `None`
    pub fn optional_integer(&self, name: &str) -> Result<Option<i64>, InvocationError> {
        match self.get(name) {
            None | Some(ArgValue::Null) => Ok(None),
            Some(ArgValue::Integer(n)) => Ok(Some(*n)),
            _ => Err(Self::type_mismatch(name, "integer")),
        }
    }

    /// Optional text: `Null` (or missing) yields `None`
    pub fn optional_text(&self, name: &str) -> Result<Option<&str>, InvocationError> {
        match self.get(name) {
            None | Some(ArgValue::Null) => Ok(None),
            Some(ArgValue::Text(s)) | Some(ArgValue::Enum(s)) => Ok(Some(s)),
            _ => Err(Self::type_mismatch(name, "text")),
        }
    }

    /// The live cancellation token, if the function declared the implicit parameter
    pub fn cancellation(&self) -> Option<&CancellationToken> {
        self.values.iter().find_map(|(_, v)| match v {
            ArgValue::Cancellation(token) => Some(token),
            _ => None,
        })
    }

    fn type_mismatch(name: &str, expected: &str) -> InvocationError {
        InvocationError::new(format!("Argument '{}' is not a {} value", name, expected))
    }
}

/// Boxed future returned by every invoker
pub type InvocationFuture = BoxFuture<'static, Result<InvocationOutput, InvocationError>>;

type Invoker = Arc<dyn Fn(InvocationArgs) -> InvocationFuture + Send + Sync>;

/// One entry of a plugin's registration table
#[derive(Clone)]
pub struct PluginFunction {
    descriptor: FunctionDescriptor,
    invoker: Invoker,
}

impl PluginFunction {
    /// Register a raw invoker that already returns an [`InvocationFuture`]
    pub fn from_invoker<F>(descriptor: FunctionDescriptor, invoker: F) -> Self
    where
        F: Fn(InvocationArgs) -> InvocationFuture + Send + Sync + 'static,
    {
        Self {
            descriptor,
            invoker: Arc::new(invoker),
        }
    }

    /// Register a synchronous function returning text
    pub fn sync<F>(descriptor: FunctionDescriptor, f: F) -> Self
    where
        F: Fn(InvocationArgs) -> Result<String, InvocationError> + Send + Sync + 'static,
    {
        Self::from_invoker(descriptor, move |args| {
            futures::future::ready(f(args).map(InvocationOutput::Text)).boxed()
        })
    }

    /// Register an async function producing text
    pub fn text<F, Fut>(descriptor: FunctionDescriptor, f: F) -> Self
    where
        F: Fn(InvocationArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, InvocationError>> + Send + 'static,
    {
        Self::from_invoker(descriptor, move |args| {
            f(args).map(|r| r.map(InvocationOutput::Text)).boxed()
        })
    }

    /// Register an async function producing nothing
    pub fn unit<F, Fut>(descriptor: FunctionDescriptor, f: F) -> Self
    where
        F: Fn(InvocationArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), InvocationError>> + Send + 'static,
    {
        Self::from_invoker(descriptor, move |args| {
            f(args).map(|r| r.map(|_| InvocationOutput::Unit)).boxed()
        })
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn descriptor(&self) -> &FunctionDescriptor {
        &self.descriptor
    }

    /// Start the invocation. The returned future owns everything it needs.
    pub fn invoke(&self, args: InvocationArgs) -> InvocationFuture {
        (self.invoker)(args)
    }
}

impl fmt::Debug for PluginFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginFunction")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}
