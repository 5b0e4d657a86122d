//! "Actions taken" summary rendered from the audit trail

use crate::call::entities::CallResult;

pub const NO_ACTIONS: &str = "No actions taken.";

/// One line per result, in order
pub fn render_summary(results: &[CallResult]) -> String {
    if results.is_empty() {
        return NO_ACTIONS.to_string();
    }
    results
        .iter()
        .map(CallResult::summary_line)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call::entities::PlannedCall;

    #[test]
    fn test_empty_summary() {
        assert_eq!(render_summary(&[]), "No actions taken.");
    }

    #[test]
    fn test_success_and_failure_lines() {
        let create = PlannedCall::new("ToDos", "create_todo").with_arg("description", "Buy milk");
        let delete = PlannedCall::new("ToDos", "delete_todo").with_arg("todoId", "x");
        let results = vec![
            CallResult::success(&create, "Created todo 1"),
            CallResult::failure(&delete, "blocked"),
        ];

        assert_eq!(
            render_summary(&results),
            "ToDos.create_todo: Created todo 1\nToDos.delete_todo: Failed - blocked"
        );
    }
}
