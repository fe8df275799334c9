use crate::conversation::Conversation;
use crate::error::Result;
use crate::message::Message;
use async_trait::async_trait;
use serde::Serialize;

/// Inbound lookup of conversations owned by the host.
#[async_trait]
pub trait ConversationLookup: Send + Sync {
    /// Finds a conversation by its ID.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Conversation))`: Conversation found
    /// - `Ok(None)`: Conversation not found; callers treat it as empty
    /// - `Err(_)`: Error occurred during retrieval
    async fn find_by_id(&self, conversation_id: &str) -> Result<Option<Conversation>>;
}

/// Signal to seed a new conversation from a prefix of an existing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchRequest {
    pub conversation_id: String,
    /// Last message (inclusive) of the prefix.
    pub message_id: String,
    /// The prefix itself, as read at dispatch time.
    pub history: Vec<Message>,
}

/// Outbound creator of branched conversations.
#[async_trait]
pub trait BranchCreator: Send + Sync {
    async fn branch(&self, request: BranchRequest) -> Result<()>;
}
