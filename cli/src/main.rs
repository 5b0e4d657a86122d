//! CLI entrypoint for callgate
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use callgate_application::{
    AuditLogger, AutoInvokeInput, AutoInvokeUseCase, GovernanceConfig, RunPlanInput,
    RunPlanUseCase,
};
use callgate_domain::{ConversationMessage, OutputFormat, parse_plan, render_summary};
use callgate_infrastructure::{
    ConfigLoader, FileConfig, FileLoggingConfig, JsonlAuditLogger, ScriptedModelDriver,
    sample_registry,
};
use callgate_presentation::{
    Cli, Command, ConsoleFormatter, OutputFormat as OutputArg, ProgressReporter,
    set_color_enabled,
};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Everything a subcommand needs once startup is done
struct App {
    file_config: FileConfig,
    config: GovernanceConfig,
    cancellation: CancellationToken,
    quiet: bool,
}

impl App {
    fn output_format(&self, requested: Option<OutputArg>) -> OutputFormat {
        requested
            .map(OutputFormat::from)
            .unwrap_or_else(|| self.file_config.output.format_or_default())
    }

    fn audit_logger(&self) -> Option<Arc<dyn AuditLogger>> {
        let path = self.file_config.audit.jsonl_path.as_ref()?;
        let logger = JsonlAuditLogger::open(path)?;
        info!(path = %logger.path().display(), "Audit log enabled");
        Some(Arc::new(logger))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_logging(cli.verbose, &file_config.logging)?;
    set_color_enabled(file_config.output.color);

    info!("Starting callgate");

    let (config, issues) = file_config.to_governance_config();
    if !issues.is_empty() {
        eprintln!("{}", ConsoleFormatter::format_issues(&issues));
    }

    let cancellation = CancellationToken::new();
    let ctrl_c_token = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, finishing the current call");
            ctrl_c_token.cancel();
        }
    });

    let app = App {
        file_config,
        config,
        cancellation,
        quiet: cli.quiet,
    };

    match cli.command {
        Command::Run {
            plan,
            history,
            dry_run,
            output,
        } => run_plan(&app, &plan, history.as_deref(), dry_run, output).await,
        Command::Validate {
            plan,
            history,
            output,
        } => run_plan(&app, &plan, history.as_deref(), true, output).await,
        Command::Replay { script, output } => replay(&app, &script, output).await,
        Command::Plugins => {
            println!("{}", ConsoleFormatter::format_plugins(&sample_registry()));
            Ok(())
        }
        Command::ShowConfig => {
            let sources = if cli.no_config {
                Vec::new()
            } else {
                ConfigLoader::describe_sources(cli.config.as_ref())
            };
            let effective = toml::to_string_pretty(&app.file_config)
                .context("Failed to render configuration")?;
            print!("{}", ConsoleFormatter::format_config(&sources, &effective));
            Ok(())
        }
    }
}

/// Install the tracing subscriber: stderr always, plus a daily rolling file
/// when `[logging].directory` is set. `RUST_LOG` overrides `-v`.
fn init_logging(verbose: u8, logging: &FileLoggingConfig) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter =
        || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(filter());

    let Some(directory) = &logging.directory else {
        tracing_subscriber::registry().with(stderr_layer).init();
        return Ok(None);
    };

    std::fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create log directory {}", directory.display()))?;
    let appender = tracing_appender::rolling::daily(directory, &logging.file_prefix);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .with_filter(filter());

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();
    Ok(Some(guard))
}

async fn run_plan(
    app: &App,
    plan_path: &Path,
    history_path: Option<&Path>,
    dry_run: bool,
    output: Option<OutputArg>,
) -> Result<()> {
    let text = std::fs::read_to_string(plan_path)
        .with_context(|| format!("Failed to read plan {}", plan_path.display()))?;
    let plan = parse_plan(&text)?;
    let history = match history_path {
        Some(path) => load_history(path)?,
        None => Vec::new(),
    };

    let mut use_case = RunPlanUseCase::new(
        sample_registry(),
        app.config.policy().clone(),
        app.config.execution().clone(),
    )
    .with_cancellation(app.cancellation.clone());
    if let Some(logger) = app.audit_logger() {
        use_case = use_case.with_audit_logger(logger);
    }

    let input = RunPlanInput::new(plan)
        .with_history(history)
        .with_dry_run(dry_run);

    let result = if app.quiet || dry_run {
        use_case.execute(input).await?
    } else {
        let progress = ProgressReporter::new();
        let result = use_case.execute_with_progress(input, &progress).await;
        progress.finish();
        result?
    };

    let rendered = match app.output_format(output) {
        OutputFormat::Text => ConsoleFormatter::format_run(&result, dry_run),
        OutputFormat::Json => ConsoleFormatter::format_run_json(&result, dry_run),
    };
    println!("{}", rendered);

    Ok(())
}

async fn replay(app: &App, script_path: &Path, output: Option<OutputArg>) -> Result<()> {
    let driver = ScriptedModelDriver::from_file(script_path)?;
    let input = AutoInvokeInput::new(driver.request());

    let mut use_case = AutoInvokeUseCase::new(
        Arc::new(driver),
        sample_registry(),
        app.config.policy().clone(),
        app.config.execution().clone(),
    )
    .with_cancellation(app.cancellation.clone());
    if let Some(logger) = app.audit_logger() {
        use_case = use_case.with_audit_logger(logger);
    }

    let result = if app.quiet {
        use_case.execute(input).await
    } else {
        let progress = ProgressReporter::new();
        let result = use_case.execute_with_progress(input, &progress).await;
        progress.finish();
        result
    };
    let result = result.inspect_err(|e| {
        if !e.partial_results().is_empty() {
            eprintln!("{}", render_summary(e.partial_results()));
        }
    })?;

    let rendered = match app.output_format(output) {
        OutputFormat::Text => ConsoleFormatter::format_auto_invoke(&result),
        OutputFormat::Json => ConsoleFormatter::format_auto_invoke_json(&result),
    };
    println!("{}", rendered);

    Ok(())
}

/// Read a conversation history file: a JSON array of `{role, text, timestamp}`
fn load_history(path: &Path) -> Result<Vec<ConversationMessage>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read history {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Invalid conversation history in {}", path.display()))
}
