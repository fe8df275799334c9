//! In-memory conversation repository.
//!
//! Serves conversations to `TimelineSession::open` and stores branched
//! conversations as new entries. Hosts with real persistence provide their
//! own `ConversationLookup`/`BranchCreator`.

use async_trait::async_trait;
use std::collections::HashMap;
use threadline_core::conversation::Conversation;
use threadline_core::error::Result;
use threadline_core::port::{BranchCreator, BranchRequest, ConversationLookup};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct InMemoryConversationRepository {
    conversations: RwLock<HashMap<String, Conversation>>,
    /// (source conversation, branch) pairs in creation order.
    branches: RwLock<Vec<(String, String)>>,
}

impl InMemoryConversationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-populated with `conversations`.
    pub fn with_conversations(conversations: impl IntoIterator<Item = Conversation>) -> Self {
        let conversations = conversations
            .into_iter()
            .map(|c| (c.id.clone(), c))
            .collect();
        Self {
            conversations: RwLock::new(conversations),
            branches: RwLock::default(),
        }
    }

    /// Inserts or replaces a conversation.
    pub async fn save(&self, conversation: Conversation) {
        self.conversations
            .write()
            .await
            .insert(conversation.id.clone(), conversation);
    }

    pub async fn list_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.conversations.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Ids of the conversations branched off `conversation_id`, oldest first.
    pub async fn branches_of(&self, conversation_id: &str) -> Vec<String> {
        self.branches
            .read()
            .await
            .iter()
            .filter(|(source, _)| source == conversation_id)
            .map(|(_, branch)| branch.clone())
            .collect()
    }
}

#[async_trait]
impl ConversationLookup for InMemoryConversationRepository {
    async fn find_by_id(&self, conversation_id: &str) -> Result<Option<Conversation>> {
        Ok(self.conversations.read().await.get(conversation_id).cloned())
    }
}

#[async_trait]
impl BranchCreator for InMemoryConversationRepository {
    async fn branch(&self, request: BranchRequest) -> Result<()> {
        let branch_id = Uuid::new_v4().to_string();
        let conversation = Conversation::with_messages(branch_id.clone(), request.history);

        tracing::info!(
            "[InMemoryConversationRepository] Branched {} at {} into {} ({} messages)",
            request.conversation_id,
            request.message_id,
            branch_id,
            conversation.messages.len()
        );

        self.save(conversation).await;
        self.branches
            .write()
            .await
            .push((request.conversation_id, branch_id));
        Ok(())
    }
}
