//! Audit configuration from TOML (`[audit]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw audit configuration from TOML
///
/// ```toml
/// [audit]
/// jsonl_path = "callgate-audit.jsonl"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAuditConfig {
    /// Append audit events here; unset disables the audit log
    pub jsonl_path: Option<PathBuf>,
}
