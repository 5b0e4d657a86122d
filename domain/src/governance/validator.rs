//! Plan Validator: partitions a plan into approved and blocked calls.
//!
//! Policies run in a fixed order for each call; the first one that fails
//! blocks the call with its reason and the remaining calls are still examined.
//!
//! ```text
//! PlannedCall
//!     │
//!     ▼
//! ┌──────────────┐  approved >= max_calls_per_plan   ──▶ "call limit reached"
//! │ 1. capacity  │
//! ├──────────────┤  resolver error                   ──▶ "Unknown plugin: ..."
//! │ 2. resolve   │
//! ├──────────────┤  required parameter blank/absent  ──▶ "Missing required arguments: a, b"
//! │ 3. arguments │
//! ├──────────────┤  same key N times in a row        ──▶ "repeated tool call detected"
//! │ 4. repeats   │
//! ├──────────────┤  any rule returns Block           ──▶ rule's reason
//! │ 5. safety    │
//! └──────────────┘
//!     │
//!     ▼
//!  approved (argument keys lowercased)
//! ```
//!
//! Invariant: `approved.len() + blocked.len() == plan.len()`.

use super::context::ValidationContext;
use super::policy::GovernancePolicy;
use super::resolver::resolve;
use super::safety::{SafetyRule, SafetyVerdict, default_rules};
use crate::call::entities::{CallResult, Plan, PlannedCall};

pub const CALL_LIMIT_REACHED: &str = "call limit reached";
pub const REPEATED_CALL_DETECTED: &str = "repeated tool call detected";

/// Which partition a call of the plan ended up in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallDecision {
    Approved,
    Blocked,
}

/// Result of validating a plan.
///
/// `decisions[i]` records where `plan.tool_calls[i]` went, so callers can
/// rebuild the audit trail in plan order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub approved: Vec<PlannedCall>,
    pub blocked: Vec<CallResult>,
    pub decisions: Vec<CallDecision>,
}

impl ValidationOutcome {
    pub fn total(&self) -> usize {
        self.approved.len() + self.blocked.len()
    }

    pub fn has_blocked(&self) -> bool {
        !self.blocked.is_empty()
    }

    fn approve(&mut self, call: PlannedCall) {
        self.approved.push(call);
        self.decisions.push(CallDecision::Approved);
    }

    fn block(&mut self, call: &PlannedCall, reason: impl Into<String>) {
        self.blocked.push(CallResult::failure(call, reason));
        self.decisions.push(CallDecision::Blocked);
    }
}

/// Tracks identical consecutive calls across a plan
#[derive(Debug, Default)]
struct RepetitionTracker {
    last_key: Option<String>,
    consecutive_repeats: usize,
}

impl RepetitionTracker {
    /// Record `key`; returns the repeat count after recording
    fn observe(&mut self, key: String) -> usize {
        if self.last_key.as_deref() == Some(key.as_str()) {
            self.consecutive_repeats += 1;
        } else {
            self.consecutive_repeats = 0;
            self.last_key = Some(key);
        }
        self.consecutive_repeats
    }
}

/// Validates plans against a [`GovernancePolicy`] and a list of safety rules
pub struct PlanValidator {
    policy: GovernancePolicy,
    rules: Vec<Box<dyn SafetyRule>>,
}

impl Default for PlanValidator {
    fn default() -> Self {
        Self::new(GovernancePolicy::default())
    }
}

impl std::fmt::Debug for PlanValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanValidator")
            .field("policy", &self.policy)
            .field(
                "rules",
                &self.rules.iter().map(|r| r.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl PlanValidator {
    /// Validator with the built-in safety rules
    pub fn new(policy: GovernancePolicy) -> Self {
        let rules = default_rules(&policy);
        Self { policy, rules }
    }

    /// Validator with no safety rules at all
    pub fn without_rules(policy: GovernancePolicy) -> Self {
        Self {
            policy,
            rules: Vec::new(),
        }
    }

    pub fn with_rule(mut self, rule: impl SafetyRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn policy(&self) -> &GovernancePolicy {
        &self.policy
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Partition `plan` into approved and blocked calls.
    ///
    /// Never invokes anything and never fails: every problem becomes a
    /// blocked [`CallResult`].
    pub fn validate(&self, plan: &Plan, context: &ValidationContext<'_>) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::default();
        let mut repetition = RepetitionTracker::default();

        for call in plan.iter() {
            let normalized = call.normalized();

            if outcome.approved.len() >= self.policy.max_calls_per_plan {
                outcome.block(call, CALL_LIMIT_REACHED);
                continue;
            }

            let resolved = match resolve(context.registry, &call.plugin_name, &call.function_name) {
                Ok(resolved) => resolved,
                Err(e) => {
                    outcome.block(call, e.to_string());
                    continue;
                }
            };

            let missing: Vec<&str> = resolved
                .function
                .descriptor()
                .required_parameters()
                .filter(|p| !normalized.has_value(&p.name))
                .map(|p| p.name.as_str())
                .collect();
            if !missing.is_empty() {
                outcome.block(
                    call,
                    format!("Missing required arguments: {}", missing.join(", ")),
                );
                continue;
            }

            if repetition.observe(call.key()) >= self.policy.max_consecutive_repeats {
                outcome.block(call, REPEATED_CALL_DETECTED);
                continue;
            }

            let verdict = self
                .rules
                .iter()
                .map(|rule| rule.evaluate(call, context, &outcome.approved))
                .find(SafetyVerdict::is_blocked);
            if let Some(SafetyVerdict::Block(reason)) = verdict {
                outcome.block(call, reason);
                continue;
            }

            outcome.approve(normalized);
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::governance::context::ConversationMessage;
    use crate::plugin::entities::{FunctionDescriptor, ParamKind, ParameterSpec};
    use crate::plugin::function::PluginFunction;
    use crate::plugin::registry::CapabilityRegistry;
    use crate::plugin::traits::PluginTable;

    fn ok(descriptor: FunctionDescriptor) -> PluginFunction {
        PluginFunction::sync(descriptor, |_| Ok("ok".to_string()))
    }

    fn registry() -> CapabilityRegistry {
        let todos = PluginTable::new("ToDos")
            .register(ok(FunctionDescriptor::new("create_todo", "Create")
                .with_parameter(ParameterSpec::text("description"))
                .with_parameter(
                    ParameterSpec::new("priority", ParamKind::enumeration(["low", "normal", "high"]))
                        .with_default("normal"),
                )))
            .register(ok(FunctionDescriptor::new("complete_todo", "Complete")
                .with_parameter(ParameterSpec::text("todoId"))))
            .register(ok(FunctionDescriptor::new("delete_todo", "Delete")
                .with_parameter(ParameterSpec::text("todoId"))))
            .register(ok(FunctionDescriptor::new("list_todos", "List")));
        let reminders = PluginTable::new("Reminders")
            .register(ok(FunctionDescriptor::new("create_reminder", "Create")
                .with_parameter(ParameterSpec::text("message"))
                .with_parameter(ParameterSpec::new("minutesFromNow", ParamKind::Integer))
                .with_parameter(ParameterSpec::cancellation())))
            .register(ok(FunctionDescriptor::new("delete_reminder", "Delete")
                .with_parameter(ParameterSpec::text("reminderId"))));
        let settings = PluginTable::new("Settings").register(ok(FunctionDescriptor::new(
            "set_timezone",
            "Set timezone",
        )
        .with_parameter(ParameterSpec::text("timezone"))));

        CapabilityRegistry::new()
            .register(todos)
            .register(reminders)
            .register(settings)
    }

    fn list() -> PlannedCall {
        PlannedCall::new("ToDos", "list_todos")
    }

    fn reasons(outcome: &ValidationOutcome) -> Vec<String> {
        outcome
            .blocked
            .iter()
            .map(|r| r.error().unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_partition_preserves_count() {
        let registry = registry();
        let context = ValidationContext::new(&registry);
        let plan = Plan::from_calls([
            PlannedCall::new("ToDos", "create_todo").with_arg("description", "Buy milk"),
            PlannedCall::new("Calendar", "create_event"),
            list(),
        ]);

        let outcome = PlanValidator::default().validate(&plan, &context);
        assert_eq!(outcome.total(), plan.len());
        assert_eq!(outcome.approved.len(), 2);
        assert_eq!(
            outcome.decisions,
            vec![
                CallDecision::Approved,
                CallDecision::Blocked,
                CallDecision::Approved
            ]
        );
    }

    #[test]
    fn test_capacity_limit() {
        let registry = registry();
        let context = ValidationContext::new(&registry);
        let mut plan = Plan::new();
        for i in 0..7 {
            plan = plan
                .with_call(PlannedCall::new("ToDos", "create_todo").with_arg("description", format!("item {i}")))
                .with_call(list());
        }

        let validator = PlanValidator::without_rules(GovernancePolicy::default());
        let outcome = validator.validate(&plan, &context);
        assert_eq!(outcome.approved.len(), 5);
        assert_eq!(outcome.total(), 14);
        assert!(reasons(&outcome).iter().all(|r| r == CALL_LIMIT_REACHED));
    }

    #[test]
    fn test_capacity_checked_before_resolution() {
        let registry = registry();
        let context = ValidationContext::new(&registry);
        let policy = GovernancePolicy::default().with_max_calls_per_plan(1);
        let plan = Plan::from_calls([list(), PlannedCall::new("Nope", "nothing")]);

        let outcome = PlanValidator::new(policy).validate(&plan, &context);
        assert_eq!(reasons(&outcome), vec![CALL_LIMIT_REACHED.to_string()]);
    }

    #[test]
    fn test_four_identical_calls_first_three_approved() {
        let registry = registry();
        let context = ValidationContext::new(&registry);
        let plan = Plan::from_calls([list(), list(), list(), list(), list()]);

        let outcome = PlanValidator::default().validate(&plan, &context);
        assert_eq!(outcome.approved.len(), 3);
        assert_eq!(outcome.blocked.len(), 2);
        assert!(
            reasons(&outcome)
                .iter()
                .all(|r| r.contains(REPEATED_CALL_DETECTED))
        );
    }

    #[test]
    fn test_repetition_counter_resets_on_key_change() {
        let registry = registry();
        let context = ValidationContext::new(&registry);
        let create = || PlannedCall::new("ToDos", "create_todo").with_arg("description", "x");
        let plan = Plan::from_calls([list(), list(), list(), create(), list()]);

        let validator = PlanValidator::without_rules(GovernancePolicy::default());
        let outcome = validator.validate(&plan, &context);
        assert_eq!(outcome.approved.len(), 5);
    }

    #[test]
    fn test_missing_required_arguments_reported_together() {
        let registry = registry();
        let context = ValidationContext::new(&registry);
        let plan = Plan::from_calls([PlannedCall::new("Reminders", "create_reminder")
            .with_arg("message", "   ")]);

        let outcome = PlanValidator::default().validate(&plan, &context);
        assert_eq!(
            reasons(&outcome),
            vec!["Missing required arguments: message, minutesFromNow".to_string()]
        );
    }

    #[test]
    fn test_defaulted_and_implicit_parameters_not_required() {
        let registry = registry();
        let context = ValidationContext::new(&registry);
        let plan = Plan::from_calls([
            PlannedCall::new("todos", "CREATE_TODO").with_arg("Description", "Buy milk"),
            PlannedCall::new("Reminders", "create_reminder")
                .with_arg("MESSAGE", "stretch")
                .with_arg("minutesFromNow", "10"),
        ]);

        let outcome = PlanValidator::default().validate(&plan, &context);
        assert_eq!(outcome.approved.len(), 2);
        assert_eq!(outcome.approved[0].argument("description"), Some("Buy milk"));
        assert!(outcome.approved[0].arguments.contains_key("description"));
    }

    #[test]
    fn test_unknown_plugin_and_function() {
        let registry = registry();
        let context = ValidationContext::new(&registry);
        let plan = Plan::from_calls([
            PlannedCall::new("Weather", "forecast"),
            PlannedCall::new("ToDos", "archive_todo"),
        ]);

        let reasons = reasons(&PlanValidator::default().validate(&plan, &context));
        assert!(reasons[0].contains("Unknown plugin"));
        assert!(reasons[1].contains("Unknown function"));
    }

    #[test]
    fn test_timezone_gate() {
        let registry = registry();
        let plan = Plan::from_calls([
            PlannedCall::new("Settings", "set_timezone").with_arg("timezone", "Europe/Berlin")
        ]);
        let validator = PlanValidator::default();

        let quiet = vec![ConversationMessage::user("add milk to my list")];
        let outcome = validator.validate(&plan, &ValidationContext::new(&registry).with_messages(&quiet));
        assert_eq!(outcome.blocked.len(), 1);

        let asked = vec![ConversationMessage::user("set my TZ to Berlin please")];
        let outcome = validator.validate(&plan, &ValidationContext::new(&registry).with_messages(&asked));
        assert_eq!(outcome.approved.len(), 1);
    }

    #[test]
    fn test_create_then_delete_in_same_plan() {
        let registry = registry();
        let context = ValidationContext::new(&registry);
        let plan = Plan::from_calls([
            PlannedCall::new("ToDos", "create_todo").with_arg("description", "Buy milk"),
            PlannedCall::new("ToDos", "delete_todo").with_arg("todoId", "x"),
        ]);

        let outcome = PlanValidator::default().validate(&plan, &context);
        assert_eq!(outcome.approved.len(), 1);
        assert_eq!(outcome.approved[0].function_name, "create_todo");
        assert_eq!(outcome.blocked.len(), 1);
        assert_eq!(outcome.blocked[0].function_name, "delete_todo");
        assert!(!outcome.blocked[0].success);
    }

    #[test]
    fn test_create_then_complete_in_same_plan() {
        let registry = registry();
        let context = ValidationContext::new(&registry);
        let plan = Plan::from_calls([
            PlannedCall::new("ToDos", "create_todo").with_arg("description", "Buy milk"),
            PlannedCall::new("ToDos", "complete_todo").with_arg("todoId", "1"),
        ]);

        let outcome = PlanValidator::default().validate(&plan, &context);
        assert_eq!(outcome.decisions, vec![CallDecision::Approved, CallDecision::Blocked]);
        assert_eq!(outcome.blocked[0].function_name, "complete_todo");
        assert!(reasons(&outcome)[0].contains("would undo ToDos.create_todo"));
    }

    #[test]
    fn test_create_then_delete_reminder_in_same_plan() {
        let registry = registry();
        let context = ValidationContext::new(&registry);
        let plan = Plan::from_calls([
            PlannedCall::new("Reminders", "create_reminder")
                .with_arg("message", "Stretch")
                .with_arg("minutesFromNow", "30"),
            PlannedCall::new("Reminders", "delete_reminder").with_arg("reminderId", "1"),
        ]);

        let outcome = PlanValidator::default().validate(&plan, &context);
        assert_eq!(outcome.approved.len(), 1);
        assert_eq!(outcome.approved[0].function_name, "create_reminder");
        assert_eq!(outcome.blocked.len(), 1);
        assert_eq!(outcome.blocked[0].function_name, "delete_reminder");
    }

    #[test]
    fn test_blocked_create_does_not_block_later_delete() {
        let registry = registry();
        let context = ValidationContext::new(&registry);
        let plan = Plan::from_calls([
            PlannedCall::new("ToDos", "create_todo"),
            PlannedCall::new("ToDos", "delete_todo").with_arg("todoId", "7"),
        ]);

        let outcome = PlanValidator::default().validate(&plan, &context);
        assert_eq!(outcome.decisions, vec![CallDecision::Blocked, CallDecision::Approved]);
        assert_eq!(outcome.approved[0].function_name, "delete_todo");
        assert!(reasons(&outcome)[0].starts_with("Missing required arguments"));
    }

    #[test]
    fn test_blank_duplicate_key_does_not_satisfy_required_argument() {
        let registry = registry();
        let context = ValidationContext::new(&registry);
        let plan = Plan::from_calls([
            PlannedCall::new("ToDos", "create_todo")
                .with_arg("Description", "Buy milk")
                .with_arg("description", "  "),
            PlannedCall::new("ToDos", "create_todo")
                .with_arg("DESCRIPTION", "  ")
                .with_arg("description", ""),
        ]);

        let validator = PlanValidator::without_rules(GovernancePolicy::default());
        let outcome = validator.validate(&plan, &context);
        assert_eq!(outcome.decisions, vec![CallDecision::Approved, CallDecision::Blocked]);
        assert!(outcome.approved[0].has_value("description"));
        assert_eq!(outcome.approved[0].argument("description"), Some("Buy milk"));
        assert_eq!(
            reasons(&outcome),
            vec!["Missing required arguments: description".to_string()]
        );
    }

    #[test]
    fn test_custom_rule() {
        struct NoLists;
        impl SafetyRule for NoLists {
            fn name(&self) -> &str {
                "no-lists"
            }
            fn evaluate(
                &self,
                call: &PlannedCall,
                _context: &ValidationContext<'_>,
                _approved: &[PlannedCall],
            ) -> SafetyVerdict {
                if call.function_name.starts_with("list_") {
                    SafetyVerdict::Block("lists are disabled".to_string())
                } else {
                    SafetyVerdict::Allow
                }
            }
        }

        let registry = registry();
        let context = ValidationContext::new(&registry);
        let validator = PlanValidator::default().with_rule(NoLists);
        assert_eq!(
            validator.rule_names(),
            vec!["timezone-discussed", "create-then-undo", "no-lists"]
        );

        let outcome = validator.validate(&Plan::from_calls([list()]), &context);
        assert_eq!(reasons(&outcome), vec!["lists are disabled".to_string()]);
    }

    #[test]
    fn test_empty_plan() {
        let registry = registry();
        let context = ValidationContext::new(&registry);
        let outcome = PlanValidator::default().validate(&Plan::new(), &context);
        assert_eq!(outcome, ValidationOutcome::default());
    }
}
