//! CLI command definitions

use callgate_domain::OutputFormat as DomainOutputFormat;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for audit results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One summary line per call
    Text,
    /// The full result list as JSON
    Json,
}

impl From<OutputFormat> for DomainOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => DomainOutputFormat::Text,
            OutputFormat::Json => DomainOutputFormat::Json,
        }
    }
}

/// CLI arguments for callgate
#[derive(Parser, Debug)]
#[command(name = "callgate")]
#[command(author, version, about = "Governance gate for model-proposed tool calls")]
#[command(long_about = r#"
callgate validates and executes function calls proposed by a language model.

Two modes are supported:
1. Plan mode: a whole batch of calls is validated up front (call limit,
   repetition, required arguments, safety rules) and only approved calls run.
2. Auto-invoke mode: the model calls functions one at a time while a loop
   guard watches for runaway repetition and budget overruns.

Configuration files are loaded from (in priority order):
1. CALLGATE_* environment variables
2. --config <path>     Explicit config file
3. ./callgate.toml     Project-level config
4. ~/.config/callgate/config.toml   Global config

Example:
  callgate run plan.json --history chat.json
  callgate validate plan.json
  callgate replay script.json
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a plan and execute the approved calls
    Run {
        /// Plan file (JSON, optionally inside a ```json fence)
        plan: PathBuf,

        /// Conversation history (JSON array of {role, text, timestamp})
        #[arg(long, value_name = "FILE")]
        history: Option<PathBuf>,

        /// Validate only; approved calls are not executed
        #[arg(long)]
        dry_run: bool,

        /// Output format (defaults to [output].format, then text)
        #[arg(short, long, value_enum)]
        output: Option<OutputFormat>,
    },

    /// Validate a plan without executing anything
    Validate {
        /// Plan file
        plan: PathBuf,

        /// Conversation history
        #[arg(long, value_name = "FILE")]
        history: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum)]
        output: Option<OutputFormat>,
    },

    /// Replay a scripted model through the auto-invoke loop
    Replay {
        /// Script file ({"request": ..., "steps": [...]})
        script: PathBuf,

        /// Output format
        #[arg(short, long, value_enum)]
        output: Option<OutputFormat>,
    },

    /// List registered plugins and their function signatures
    Plugins,

    /// Show configuration sources and effective values
    ShowConfig,
}
