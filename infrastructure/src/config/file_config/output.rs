//! Output configuration from TOML (`[output]` section)

use callgate_domain::OutputFormat;
use serde::{Deserialize, Serialize};

/// How the CLI prints audit results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Default format when `--output` is not given
    pub format: Option<OutputFormat>,
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}

impl FileOutputConfig {
    pub fn format_or_default(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_deserialize() {
        let toml_str = r#"
[output]
format = "json"
color = false
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.output.format, Some(OutputFormat::Json));
        assert!(!config.output.color);
    }

    #[test]
    fn test_defaults() {
        let config = FileOutputConfig::default();
        assert!(config.color);
        assert_eq!(config.format_or_default(), OutputFormat::Text);
    }
}
