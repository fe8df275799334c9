//! Conversation snapshot model.

use crate::message::Message;
use serde::{Deserialize, Serialize};

/// A conversation as handed over by the lookup collaborator.
///
/// `messages` is in causal order. `token_count` is the aggregate the host last
/// observed; the store recomputes it on load and keeps it exact afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub messages: Vec<Message>,
    #[serde(default)]
    pub token_count: usize,
}

impl Conversation {
    pub fn with_messages(id: impl Into<String>, messages: Vec<Message>) -> Self {
        let token_count = messages.iter().map(|m| m.token_count).sum();
        Self {
            id: id.into(),
            messages,
            token_count,
        }
    }
}
