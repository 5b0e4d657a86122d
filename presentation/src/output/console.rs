//! Console output formatter for governance results

use callgate_application::{AutoInvokeOutput, RunPlanOutput};
use callgate_domain::{CallResult, CapabilityRegistry, ConfigIssue, Severity, render_summary};
use colored::Colorize;
use serde_json::json;

/// Turn colored output off (e.g. `[output] color = false`)
pub fn set_color_enabled(enabled: bool) {
    if !enabled {
        colored::control::set_override(false);
    }
}

/// Formats audit trails, plugin listings and config diagnostics for the terminal
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format a plan-mode result
    pub fn format_run(output: &RunPlanOutput, dry_run: bool) -> String {
        let title = if dry_run { "Plan Validation" } else { "Plan Results" };
        let mut text = String::new();

        text.push_str(&Self::header(title));
        text.push('\n');
        text.push_str(&Self::result_lines(&output.results));

        text.push_str(&Self::section_header("Summary"));
        let counts = format!(
            "{} proposed: {} approved, {} blocked",
            output.results.len(),
            output.approved_count,
            output.blocked_count
        );
        text.push_str(&format!("{}\n", counts.bold()));
        if !dry_run {
            let failed = output.failed_count().saturating_sub(output.blocked_count);
            if failed > 0 {
                text.push_str(&format!("{}\n", format!("{} failed during execution", failed).red()));
            }
        }
        if output.cancelled {
            text.push_str(&format!("{}\n", "Cancelled before all approved calls ran".yellow()));
        }

        text
    }

    /// Format an auto-invoke result
    pub fn format_auto_invoke(output: &AutoInvokeOutput) -> String {
        let mut text = String::new();

        text.push_str(&Self::header("Auto-invoke Results"));
        text.push('\n');
        text.push_str(&Self::result_lines(&output.results));

        text.push_str(&Self::section_header("Response"));
        match &output.terminated {
            Some(reason) => {
                text.push_str(&format!("{} {}\n", "Loop stopped:".yellow().bold(), reason));
            }
            None if output.content.is_empty() => {
                text.push_str(&format!("{}\n", "(empty response)".dimmed()));
            }
            None => {
                text.push_str(&output.content);
                text.push('\n');
            }
        }

        text
    }

    /// Plan result as JSON
    pub fn format_run_json(output: &RunPlanOutput, dry_run: bool) -> String {
        let value = json!({
            "dryRun": dry_run,
            "approvedCount": output.approved_count,
            "blockedCount": output.blocked_count,
            "cancelled": output.cancelled,
            "summary": output.summary,
            "results": output.results,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    /// Auto-invoke result as JSON
    pub fn format_auto_invoke_json(output: &AutoInvokeOutput) -> String {
        let value = json!({
            "success": output.success,
            "content": output.content,
            "terminated": output.terminated,
            "summary": render_summary(&output.results),
            "results": output.results,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    /// List every plugin with its function signatures
    pub fn format_plugins(registry: &CapabilityRegistry) -> String {
        let mut text = String::new();
        text.push_str(&Self::header("Registered Plugins"));
        text.push('\n');

        for plugin in registry.plugins() {
            text.push_str(&format!("\n{}", plugin.name().yellow().bold()));
            if !plugin.description().is_empty() {
                text.push_str(&format!("  {}", plugin.description().dimmed()));
            }
            text.push('\n');
            for function in plugin.functions() {
                let descriptor = function.descriptor();
                text.push_str(&format!("  {}", descriptor.signature().cyan()));
                if !descriptor.description.is_empty() {
                    text.push_str(&format!("  {}", descriptor.description.dimmed()));
                }
                text.push('\n');
            }
        }

        text
    }

    /// Configuration diagnostics, one per line
    pub fn format_issues(issues: &[ConfigIssue]) -> String {
        issues
            .iter()
            .map(|issue| match issue.severity {
                Severity::Error => format!("{} {}", "error:".red().bold(), issue.message),
                Severity::Warning => format!("{} {}", "warning:".yellow().bold(), issue.message),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Configuration sources followed by the effective values
    pub fn format_config(sources: &[String], effective: &str) -> String {
        let mut text = String::new();
        if sources.is_empty() {
            text.push_str(&format!("{}\n", "Configuration files disabled, using built-in defaults".dimmed()));
        }
        for source in sources {
            text.push_str(source);
            text.push('\n');
        }
        text.push_str(&Self::section_header("Effective configuration"));
        text.push_str(effective);
        if !effective.ends_with('\n') {
            text.push('\n');
        }
        text
    }

    fn result_lines(results: &[CallResult]) -> String {
        if results.is_empty() {
            return format!("\n  {}\n", render_summary(results).dimmed());
        }

        let mut text = String::from("\n");
        for result in results {
            let line = result.summary_line();
            if result.success {
                text.push_str(&format!("  {} {}\n", "v".green(), line));
            } else {
                text.push_str(&format!("  {} {}\n", "x".red(), line.red()));
            }
        }
        text
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }
}
