//! Plugin domain module
//!
//! Defines how callable capabilities are described and looked up.
//!
//! # Overview
//!
//! Every plugin function is a [`FunctionDescriptor`] (name, typed parameter
//! list, defaults) paired with an invoker closure in a [`PluginFunction`].
//! Plugins expose these through an explicit registration table rather than
//! runtime type inspection, so a string name from a model can be resolved
//! late, at request time, against metadata that was fixed at construction.
//!
//! ```text
//! ┌────────────────────┐    ┌──────────────────┐    ┌────────────────┐
//! │ CapabilityRegistry │───▶│ Plugin           │───▶│ PluginFunction │
//! │ (case-insensitive) │    │ (function table) │    │ descriptor +   │
//! └────────────────────┘    └──────────────────┘    │ invoker        │
//!                                                   └────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`CapabilityRegistry`]: plugin name → plugin instance
//! - [`Plugin`] / [`PluginTable`]: capability provider and its table-backed implementation
//! - [`PluginFunction`]: descriptor plus boxed async invoker
//! - [`ParamKind`]: closed set of native parameter types

pub mod entities;
pub mod function;
pub mod registry;
pub mod traits;

pub use entities::{FunctionDescriptor, ParamKind, ParameterSpec};
pub use function::{
    ArgValue, InvocationArgs, InvocationError, InvocationFuture, InvocationOutput, PluginFunction,
};
pub use registry::CapabilityRegistry;
pub use traits::{Plugin, PluginTable};
