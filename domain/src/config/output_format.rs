//! Output format value object

use serde::{Deserialize, Serialize};

/// How audit results are printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable summary (default)
    #[default]
    Text,
    /// The full `CallResult` list as JSON
    Json,
}
