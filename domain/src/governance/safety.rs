//! Domain safety rules: the last stage of plan validation.
//!
//! Each [`SafetyRule`] recognises a family of actions and either allows or
//! blocks them. Rules only ever see calls that already passed capacity,
//! resolution, argument and repetition checks.
//!
//! | Rule | Reacts to | Blocks when |
//! |------|-----------|-------------|
//! | [`TimezoneDiscussedRule`] | `set_timezone` and friends | no recent message mentions a timezone keyword |
//! | [`CreateThenUndoRule`] | `complete_*`, `delete_*`, `cancel_*`, `remove_*` | a `create_*`/`add_*` for the same plugin was approved earlier in the plan |

use super::context::ValidationContext;
use super::policy::GovernancePolicy;
use crate::call::entities::PlannedCall;

/// Result of evaluating one rule against one call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SafetyVerdict {
    Allow,
    Block(String),
}

impl SafetyVerdict {
    pub fn is_blocked(&self) -> bool {
        matches!(self, SafetyVerdict::Block(_))
    }
}

/// A domain-specific guard on side-effecting actions
pub trait SafetyRule: Send + Sync {
    /// Short identifier, used in logs
    fn name(&self) -> &str;

    /// Evaluate `call`, given the calls approved so far in the same plan.
    ///
    /// Rules that do not recognise the action must return [`SafetyVerdict::Allow`].
    fn evaluate(
        &self,
        call: &PlannedCall,
        context: &ValidationContext<'_>,
        approved: &[PlannedCall],
    ) -> SafetyVerdict;
}

const TIMEZONE_CHANGE_FUNCTIONS: &[&str] = &["set_timezone", "change_timezone", "update_timezone"];

/// Blocks timezone changes nobody asked for
#[derive(Debug, Clone)]
pub struct TimezoneDiscussedRule {
    keywords: Vec<String>,
}

impl TimezoneDiscussedRule {
    pub fn new(keywords: Vec<String>) -> Self {
        Self { keywords }
    }
}

impl SafetyRule for TimezoneDiscussedRule {
    fn name(&self) -> &str {
        "timezone-discussed"
    }

    fn evaluate(
        &self,
        call: &PlannedCall,
        context: &ValidationContext<'_>,
        _approved: &[PlannedCall],
    ) -> SafetyVerdict {
        let function = call.function_name.trim().to_lowercase();
        if !TIMEZONE_CHANGE_FUNCTIONS.contains(&function.as_str()) {
            return SafetyVerdict::Allow;
        }
        if context.any_message_mentions(&self.keywords) {
            SafetyVerdict::Allow
        } else {
            SafetyVerdict::Block(
                "timezone change was not discussed in the recent conversation".to_string(),
            )
        }
    }
}

const CREATE_PREFIXES: &[&str] = &["create_", "add_"];
const UNDO_PREFIXES: &[&str] = &["complete_", "delete_", "cancel_", "remove_"];

fn has_prefix(name: &str, prefixes: &[&str]) -> bool {
    let name = name.trim().to_lowercase();
    prefixes.iter().any(|p| name.starts_with(p))
}

/// Blocks undoing a resource the same plan just created.
///
/// Scope is the current plan only and matching is by plugin, not by
/// resource identity.
#[derive(Debug, Clone, Default)]
pub struct CreateThenUndoRule;

impl SafetyRule for CreateThenUndoRule {
    fn name(&self) -> &str {
        "create-then-undo"
    }

    fn evaluate(
        &self,
        call: &PlannedCall,
        _context: &ValidationContext<'_>,
        approved: &[PlannedCall],
    ) -> SafetyVerdict {
        if !has_prefix(&call.function_name, UNDO_PREFIXES) {
            return SafetyVerdict::Allow;
        }

        let plugin = call.plugin_name.trim();
        let created = approved.iter().find(|earlier| {
            earlier.plugin_name.trim().eq_ignore_ascii_case(plugin)
                && has_prefix(&earlier.function_name, CREATE_PREFIXES)
        });

        match created {
            Some(earlier) => SafetyVerdict::Block(format!(
                "{}.{} would undo {}.{} from the same plan",
                call.plugin_name, call.function_name, earlier.plugin_name, earlier.function_name
            )),
            None => SafetyVerdict::Allow,
        }
    }
}

/// The built-in rule set, in evaluation order
pub fn default_rules(policy: &GovernancePolicy) -> Vec<Box<dyn SafetyRule>> {
    vec![
        Box::new(TimezoneDiscussedRule::new(policy.timezone_keywords.clone())),
        Box::new(CreateThenUndoRule),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::governance::context::ConversationMessage;
    use crate::plugin::registry::CapabilityRegistry;

    fn timezone_rule() -> TimezoneDiscussedRule {
        TimezoneDiscussedRule::new(GovernancePolicy::default().timezone_keywords)
    }

    #[test]
    fn test_timezone_rule_blocks_without_keyword() {
        let registry = CapabilityRegistry::new();
        let messages = vec![ConversationMessage::user("remind me to call mom")];
        let context = ValidationContext::new(&registry).with_messages(&messages);
        let call = PlannedCall::new("Settings", "Set_Timezone").with_arg("timezone", "UTC");

        assert!(timezone_rule().evaluate(&call, &context, &[]).is_blocked());
    }

    #[test]
    fn test_timezone_rule_allows_with_keyword() {
        let registry = CapabilityRegistry::new();
        let messages = vec![ConversationMessage::user("Change my Time Zone to Tokyo")];
        let context = ValidationContext::new(&registry).with_messages(&messages);
        let call = PlannedCall::new("Settings", "set_timezone").with_arg("timezone", "Asia/Tokyo");

        assert_eq!(
            timezone_rule().evaluate(&call, &context, &[]),
            SafetyVerdict::Allow
        );
    }

    #[test]
    fn test_timezone_rule_ignores_other_functions() {
        let registry = CapabilityRegistry::new();
        let context = ValidationContext::new(&registry);
        let call = PlannedCall::new("Settings", "get_timezone");

        assert_eq!(
            timezone_rule().evaluate(&call, &context, &[]),
            SafetyVerdict::Allow
        );
    }

    #[test]
    fn test_create_then_undo_same_plugin() {
        let registry = CapabilityRegistry::new();
        let context = ValidationContext::new(&registry);
        let approved = vec![PlannedCall::new("ToDos", "create_todo").with_arg("description", "x")];
        let call = PlannedCall::new("todos", "delete_todo").with_arg("todoId", "1");

        match CreateThenUndoRule.evaluate(&call, &context, &approved) {
            SafetyVerdict::Block(reason) => {
                assert!(reason.contains("create_todo"));
                assert!(reason.contains("same plan"));
            }
            SafetyVerdict::Allow => panic!("expected block"),
        }
    }

    #[test]
    fn test_create_then_undo_other_plugin_allowed() {
        let registry = CapabilityRegistry::new();
        let context = ValidationContext::new(&registry);
        let approved = vec![PlannedCall::new("ToDos", "create_todo")];
        let call = PlannedCall::new("Reminders", "delete_reminder");

        assert_eq!(
            CreateThenUndoRule.evaluate(&call, &context, &approved),
            SafetyVerdict::Allow
        );
    }

    #[test]
    fn test_undo_without_prior_create_allowed() {
        let registry = CapabilityRegistry::new();
        let context = ValidationContext::new(&registry);
        let approved = vec![PlannedCall::new("ToDos", "list_todos")];
        let call = PlannedCall::new("ToDos", "complete_todo");

        assert_eq!(
            CreateThenUndoRule.evaluate(&call, &context, &approved),
            SafetyVerdict::Allow
        );
    }

    #[test]
    fn test_default_rules_order() {
        let rules = default_rules(&GovernancePolicy::default());
        let names: Vec<_> = rules.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["timezone-discussed", "create-then-undo"]);
    }
}
