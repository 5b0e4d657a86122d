//! Validation context: registry plus recent conversation

use crate::plugin::registry::CapabilityRegistry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author of a conversation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// One message of recent conversation history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: MessageRole,
    pub text: String,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl ConversationMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Case-insensitive substring match
    pub fn mentions(&self, keyword: &str) -> bool {
        self.text.to_lowercase().contains(&keyword.to_lowercase())
    }
}

/// Read-only input to plan validation
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    pub registry: &'a CapabilityRegistry,
    pub recent_messages: &'a [ConversationMessage],
}

impl<'a> ValidationContext<'a> {
    pub fn new(registry: &'a CapabilityRegistry) -> Self {
        Self {
            registry,
            recent_messages: &[],
        }
    }

    pub fn with_messages(mut self, messages: &'a [ConversationMessage]) -> Self {
        self.recent_messages = messages;
        self
    }

    /// Whether any recent message mentions any of the keywords
    pub fn any_message_mentions(&self, keywords: &[String]) -> bool {
        self.recent_messages
            .iter()
            .any(|m| keywords.iter().any(|k| m.mentions(k)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mentions_is_case_insensitive() {
        let message = ConversationMessage::user("Please switch my TimeZone to Berlin");
        assert!(message.mentions("timezone"));
        assert!(!message.mentions("time zone"));
    }

    #[test]
    fn test_any_message_mentions() {
        let registry = CapabilityRegistry::new();
        let messages = vec![
            ConversationMessage::user("remind me to stretch"),
            ConversationMessage::assistant("Sure. Anything about your TZ?"),
        ];
        let context = ValidationContext::new(&registry).with_messages(&messages);

        assert!(context.any_message_mentions(&["tz".to_string()]));
        assert!(!context.any_message_mentions(&["timezone".to_string()]));
    }

    #[test]
    fn test_message_deserializes_from_history_json() {
        let json = r#"{"role": "user", "text": "hi", "timestamp": "2026-01-05T10:00:00Z"}"#;
        let message: ConversationMessage = serde_json::from_str(json).unwrap();
        assert_eq!(message.role, MessageRole::User);
        assert_eq!(message.text, "hi");
    }
}
