//! Progress reporting for call execution

use callgate_application::GovernanceProgress;
use callgate_domain::{CallResult, PlannedCall};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports progress with an indicatif bar (plan mode) or spinner (auto-invoke)
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {pos} calls {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    /// Clear the bar once the request is over
    pub fn finish(&self) {
        if let Ok(mut bar) = self.bar.lock()
            && let Some(pb) = bar.take()
        {
            pb.finish_and_clear();
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl GovernanceProgress for ProgressReporter {
    fn on_validation_complete(&self, approved: usize, blocked: usize) {
        let pb = ProgressBar::new(approved as u64);
        pb.set_style(Self::bar_style());
        pb.set_prefix("Executing");
        if blocked > 0 {
            pb.set_message(format!("{} blocked", blocked).yellow().to_string());
        }
        if let Ok(mut bar) = self.bar.lock() {
            *bar = Some(pb);
        }
    }

    fn on_call_start(&self, call: &PlannedCall) {
        let Ok(mut bar) = self.bar.lock() else {
            return;
        };
        let pb = bar.get_or_insert_with(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(Self::spinner_style());
            pb.set_prefix("Auto-invoke");
            pb
        });
        pb.set_message(format!("{}.{}", call.plugin_name, call.function_name));
        pb.tick();
    }

    fn on_call_complete(&self, result: &CallResult) {
        if let Ok(bar) = self.bar.lock()
            && let Some(pb) = bar.as_ref()
        {
            let key = format!("{}.{}", result.plugin_name, result.function_name);
            let status = if result.success {
                format!("{} {}", "v".green(), key)
            } else {
                format!("{} {}", "x".red(), key)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_loop_terminated(&self, reason: &str) {
        if let Ok(mut bar) = self.bar.lock()
            && let Some(pb) = bar.take()
        {
            pb.abandon_with_message(format!("{} {}", "stopped:".yellow(), reason));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_without_terminal() {
        let reporter = ProgressReporter::new();
        let call = PlannedCall::new("ToDos", "list_todos");

        reporter.on_validation_complete(1, 2);
        reporter.on_call_start(&call);
        reporter.on_call_complete(&CallResult::success(&call, "No todos."));
        assert_eq!(
            reporter.bar.lock().unwrap().as_ref().map(|pb| pb.position()),
            Some(1)
        );

        reporter.finish();
        assert!(reporter.bar.lock().unwrap().is_none());
    }

    #[test]
    fn test_spinner_created_lazily_and_cleared_on_termination() {
        let reporter = ProgressReporter::new();
        reporter.on_call_start(&PlannedCall::new("Settings", "get_timezone"));
        assert!(reporter.bar.lock().unwrap().is_some());

        reporter.on_loop_terminated("call limit reached for this request");
        assert!(reporter.bar.lock().unwrap().is_none());
    }
}
