//! Model driver adapters

pub mod scripted;

pub use scripted::{ScriptError, ScriptedModelDriver};
