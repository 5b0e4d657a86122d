//! `Reminders` plugin - timed reminders held in memory

use super::lock;
use callgate_domain::{
    FunctionDescriptor, InvocationError, ParamKind, ParameterSpec, Plugin, PluginFunction,
};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use std::sync::{Arc, Mutex};

pub const PLUGIN_NAME: &str = "Reminders";

#[derive(Debug, Clone)]
struct Reminder {
    id: u64,
    message: String,
    due_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct ReminderStore {
    next_id: u64,
    reminders: Vec<Reminder>,
}

pub struct RemindersPlugin {
    functions: Vec<PluginFunction>,
}

impl RemindersPlugin {
    pub fn new() -> Self {
        let store = Arc::new(Mutex::new(ReminderStore::default()));
        Self {
            functions: vec![
                create_reminder(store.clone()),
                delete_reminder(store.clone()),
                list_reminders(store),
            ],
        }
    }
}

impl Default for RemindersPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for RemindersPlugin {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn description(&self) -> &str {
        "Schedule reminders relative to now"
    }

    fn functions(&self) -> &[PluginFunction] {
        &self.functions
    }
}

fn format_due(due_at: &DateTime<Utc>) -> String {
    due_at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn create_reminder(store: Arc<Mutex<ReminderStore>>) -> PluginFunction {
    let descriptor = FunctionDescriptor::new("create_reminder", "Schedule a reminder")
        .with_parameter(ParameterSpec::text("message"))
        .with_parameter(
            ParameterSpec::new("minutesFromNow", ParamKind::Integer)
                .with_description("Delay in minutes, must be positive"),
        );

    PluginFunction::sync(descriptor, move |args| {
        let message = args.text("message")?.trim().to_string();
        let minutes = args.integer("minutesFromNow")?;
        if minutes <= 0 {
            return Err(InvocationError::new(format!(
                "minutesFromNow must be positive, got {}",
                minutes
            )));
        }
        let delay = Duration::try_minutes(minutes)
            .ok_or_else(|| InvocationError::new("minutesFromNow is too large"))?;
        let due_at = Utc::now()
            .checked_add_signed(delay)
            .ok_or_else(|| InvocationError::new("minutesFromNow is too large"))?;

        let mut store = lock(&store)?;
        store.next_id += 1;
        let id = store.next_id;
        store.reminders.push(Reminder {
            id,
            message: message.clone(),
            due_at,
        });
        Ok(format!("Reminder {} set for {}: {}", id, format_due(&due_at), message))
    })
}

fn delete_reminder(store: Arc<Mutex<ReminderStore>>) -> PluginFunction {
    let descriptor = FunctionDescriptor::new("delete_reminder", "Cancel a scheduled reminder")
        .with_parameter(ParameterSpec::text("reminderId"));

    PluginFunction::sync(descriptor, move |args| {
        let raw = args.text("reminderId")?;
        let id: u64 = raw
            .trim()
            .parse()
            .map_err(|_| InvocationError::new(format!("Invalid reminder id '{}'", raw)))?;

        let mut store = lock(&store)?;
        let index = store
            .reminders
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| InvocationError::new(format!("No reminder with id {}", id)))?;
        let reminder = store.reminders.remove(index);
        Ok(format!("Deleted reminder {}: {}", reminder.id, reminder.message))
    })
}

fn list_reminders(store: Arc<Mutex<ReminderStore>>) -> PluginFunction {
    let descriptor = FunctionDescriptor::new("list_reminders", "List upcoming reminders, soonest first")
        .with_parameter(ParameterSpec::new(
            "limit",
            ParamKind::optional(ParamKind::Integer),
        ))
        .with_parameter(ParameterSpec::cancellation());

    PluginFunction::text(descriptor, move |args| {
        let store = store.clone();
        async move {
            if args.cancellation().is_some_and(|t| t.is_cancelled()) {
                return Err(InvocationError::new("listing cancelled"));
            }
            let limit = match args.optional_integer("limit")? {
                Some(n) if n < 0 => {
                    return Err(InvocationError::new(format!("limit must not be negative, got {}", n)));
                }
                Some(n) => usize::try_from(n).unwrap_or(usize::MAX),
                None => usize::MAX,
            };

            let mut reminders = lock(&store)?.reminders.clone();
            reminders.sort_by_key(|r| r.due_at);

            let lines: Vec<String> = reminders
                .iter()
                .take(limit)
                .map(|r| format!("{}. {} at {}", r.id, r.message, format_due(&r.due_at)))
                .collect();

            if lines.is_empty() {
                Ok("No reminders.".to_string())
            } else {
                Ok(lines.join("\n"))
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use callgate_domain::{ArgValue, InvocationArgs};
    use tokio_util::sync::CancellationToken;

    async fn call(plugin: &RemindersPlugin, function: &str, args: InvocationArgs) -> Result<String, InvocationError> {
        plugin.function(function).unwrap().invoke(args).await.map(|o| o.into_text())
    }

    fn create_args(message: &str, minutes: i64) -> InvocationArgs {
        InvocationArgs::new()
            .with("message", ArgValue::Text(message.into()))
            .with("minutesFromNow", ArgValue::Integer(minutes))
    }

    fn list_args(limit: Option<i64>, token: CancellationToken) -> InvocationArgs {
        let limit = limit.map(ArgValue::Integer).unwrap_or(ArgValue::Null);
        InvocationArgs::new()
            .with("limit", limit)
            .with("cancellation", ArgValue::Cancellation(token))
    }

    #[tokio::test]
    async fn test_create_rejects_non_positive_delay() {
        let plugin = RemindersPlugin::new();
        let err = call(&plugin, "create_reminder", create_args("Stretch", 0))
            .await
            .unwrap_err();
        assert!(err.message.contains("must be positive"));
    }

    #[tokio::test]
    async fn test_list_sorted_and_limited() {
        let plugin = RemindersPlugin::new();
        call(&plugin, "create_reminder", create_args("Later", 90)).await.unwrap();
        call(&plugin, "create_reminder", create_args("Soon", 5)).await.unwrap();

        let all = call(&plugin, "list_reminders", list_args(None, CancellationToken::new()))
            .await
            .unwrap();
        let lines: Vec<&str> = all.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("2. Soon at "));

        let one = call(&plugin, "list_reminders", list_args(Some(1), CancellationToken::new()))
            .await
            .unwrap();
        assert_eq!(one.lines().count(), 1);
    }

    #[tokio::test]
    async fn test_list_observes_cancellation() {
        let plugin = RemindersPlugin::new();
        let token = CancellationToken::new();
        token.cancel();
        let err = call(&plugin, "list_reminders", list_args(None, token))
            .await
            .unwrap_err();
        assert_eq!(err.message, "listing cancelled");
    }

    #[tokio::test]
    async fn test_delete() {
        let plugin = RemindersPlugin::new();
        call(&plugin, "create_reminder", create_args("Water plants", 10)).await.unwrap();

        let args = InvocationArgs::new().with("reminderId", ArgValue::Text("1".into()));
        assert_eq!(
            call(&plugin, "delete_reminder", args).await.unwrap(),
            "Deleted reminder 1: Water plants"
        );
        let empty = call(&plugin, "list_reminders", list_args(None, CancellationToken::new()))
            .await
            .unwrap();
        assert_eq!(empty, "No reminders.");
    }
}
