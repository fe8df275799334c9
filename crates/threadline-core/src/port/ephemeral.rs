use serde::{Deserialize, Serialize};

/// A transient status notice ("searching the web...") shown after the
/// timeline. Never stored, never counted in tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ephemeral {
    pub id: String,
    pub title: String,
    pub text: String,
}

/// External source of ephemerals for a conversation.
pub trait EphemeralSource: Send + Sync {
    fn ephemerals(&self, conversation_id: &str) -> Vec<Ephemeral>;
}

/// Source used when the host has no status feed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEphemerals;

impl EphemeralSource for NoEphemerals {
    fn ephemerals(&self, _conversation_id: &str) -> Vec<Ephemeral> {
        Vec::new()
    }
}
