//! Timeline message types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    /// Message from the user.
    User,
    /// Message from the AI assistant.
    Assistant,
    /// System prompt or system-generated message.
    System,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
            MessageRole::System => write!(f, "system"),
        }
    }
}

/// Production lifecycle of a message.
///
/// A `Streaming` message is still being produced and its text may be empty or
/// partial. Diff and length heuristics only look at `Complete` messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageState {
    Streaming,
    #[default]
    Complete,
}

/// A single message in a conversation timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Opaque identifier, stable for the message's lifetime.
    pub id: String,
    pub role: MessageRole,
    pub text: String,
    #[serde(default)]
    pub state: MessageState,
    /// Contribution to the conversation token aggregate.
    ///
    /// Assigned by the store's `TokenCounter` whenever the text changes.
    #[serde(default)]
    pub token_count: usize,
    pub created_at: DateTime<Utc>,
    /// Set when the text is edited after creation.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Message {
    /// Creates a complete message with a fresh UUID.
    pub fn new(role: MessageRole, text: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), role, text)
    }

    pub fn with_id(id: impl Into<String>, role: MessageRole, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role,
            text: text.into(),
            state: MessageState::Complete,
            token_count: 0,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageRole::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, text)
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(MessageRole::System, text)
    }

    /// An empty assistant message that will be filled by streamed chunks.
    pub fn streaming_assistant() -> Self {
        Self::assistant("").streaming()
    }

    pub fn streaming(mut self) -> Self {
        self.state = MessageState::Streaming;
        self
    }

    pub fn is_streaming(&self) -> bool {
        self.state == MessageState::Streaming
    }

    pub fn is_complete(&self) -> bool {
        self.state == MessageState::Complete
    }

    /// Length in characters, not bytes.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_messages_have_unique_ids() {
        let a = Message::user("hello");
        let b = Message::user("hello");
        assert_ne!(a.id, b.id);
        assert!(a.is_complete());
    }

    #[test]
    fn test_streaming_assistant_starts_empty() {
        let message = Message::streaming_assistant();
        assert_eq!(message.role, MessageRole::Assistant);
        assert!(message.is_streaming());
        assert!(message.text.is_empty());
    }

    #[test]
    fn test_role_serializes_snake_case() {
        let json = serde_json::to_string(&MessageRole::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
    }

    #[test]
    fn test_char_len_counts_unicode_scalars() {
        let message = Message::user("héllo");
        assert_eq!(message.char_len(), 5);
    }
}
