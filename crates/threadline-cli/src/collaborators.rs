//! Collaborators backing a replay: a scripted execution engine that streams
//! canned replies into the store, and log-only media and navigation stubs.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, OnceLock, PoisonError};
use threadline_core::conversation::SharedMessageStore;
use threadline_core::error::{Result, ThreadlineError};
use threadline_core::message::{Message, MessageRole};
use threadline_core::port::{
    DiagramRequest, DiagramRequester, Ephemeral, EphemeralSource, ExecutionEngine,
    ExecutionRequest, ImageEngine, PreferencesNavigator, PreferencesTab, SpeechEngine,
};

/// Answers execution requests with the next scripted reply, or an echo of
/// the last user message once the script runs out.
pub struct ScriptedEngine {
    store: OnceLock<SharedMessageStore>,
    replies: Mutex<VecDeque<String>>,
}

impl ScriptedEngine {
    pub fn new(replies: impl IntoIterator<Item = String>) -> Self {
        Self {
            store: OnceLock::new(),
            replies: Mutex::new(replies.into_iter().collect()),
        }
    }

    /// Binds the store replies are streamed into. Later calls are ignored.
    pub fn attach(&self, store: SharedMessageStore) {
        let _ = self.store.set(store);
    }

    fn next_reply(&self, request: &ExecutionRequest) -> String {
        let scripted = self
            .replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        scripted.unwrap_or_else(|| {
            let last_user = request
                .history
                .iter()
                .rev()
                .find(|m| m.role == MessageRole::User)
                .map(|m| m.text.as_str())
                .unwrap_or_default();
            format!("Echo: {}", last_user)
        })
    }
}

#[async_trait]
impl ExecutionEngine for ScriptedEngine {
    async fn execute(&self, request: ExecutionRequest) -> Result<()> {
        let store = self
            .store
            .get()
            .ok_or_else(|| ThreadlineError::execution("scripted engine has no store attached"))?;

        let reply = self.next_reply(&request);
        let message = Message::streaming_assistant();
        let message_id = message.id.clone();
        store.write().await.append(message)?;

        // one lock per chunk, like tokens arriving from a model
        for (i, word) in reply.split_inclusive(' ').enumerate() {
            store.write().await.append_text(&message_id, word)?;
            tracing::trace!("[ScriptedEngine] chunk {} for {}", i, message_id);
        }
        store.write().await.complete(&message_id)?;

        tracing::info!(
            "[ScriptedEngine] Answered {} with {} chars (history {}, multi_candidate={})",
            request.conversation_id,
            reply.chars().count(),
            request.history.len(),
            request.multi_candidate
        );
        Ok(())
    }
}

/// Speech, image, diagram and navigation endpoints that only log.
#[derive(Debug, Default)]
pub struct LoggingMedia;

#[async_trait]
impl SpeechEngine for LoggingMedia {
    async fn speak(&self, text: &str) -> Result<()> {
        tracing::info!("[LoggingMedia] speak: {} chars", text.chars().count());
        Ok(())
    }
}

#[async_trait]
impl ImageEngine for LoggingMedia {
    async fn imagine(&self, conversation_id: &str, text: &str) -> Result<()> {
        tracing::info!(
            "[LoggingMedia] imagine for {}: {} chars",
            conversation_id,
            text.chars().count()
        );
        Ok(())
    }
}

impl DiagramRequester for LoggingMedia {
    fn request_diagram(&self, request: DiagramRequest) {
        tracing::info!(
            "[LoggingMedia] diagram for {}/{}",
            request.conversation_id,
            request.message_id
        );
    }
}

impl PreferencesNavigator for LoggingMedia {
    fn open_preferences_tab(&self, tab: PreferencesTab) {
        tracing::info!("[LoggingMedia] would open {} preferences", tab);
    }
}

/// Ephemerals fixed by the script.
#[derive(Debug, Default)]
pub struct StaticEphemerals {
    conversation_id: String,
    ephemerals: Vec<Ephemeral>,
}

impl StaticEphemerals {
    pub fn new(conversation_id: impl Into<String>, ephemerals: Vec<Ephemeral>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            ephemerals,
        }
    }
}

impl EphemeralSource for StaticEphemerals {
    fn ephemerals(&self, conversation_id: &str) -> Vec<Ephemeral> {
        if conversation_id == self.conversation_id {
            self.ephemerals.clone()
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use threadline_core::conversation::MessageStore;
    use threadline_core::message::ApproxTokenCounter;

    fn store() -> SharedMessageStore {
        MessageStore::new("conv-1", Arc::new(ApproxTokenCounter)).into_shared()
    }

    fn request(history: Vec<Message>) -> ExecutionRequest {
        ExecutionRequest {
            conversation_id: "conv-1".to_string(),
            history,
            multi_candidate: false,
        }
    }

    #[tokio::test]
    async fn test_streams_scripted_reply_then_echoes() {
        let store = store();
        let engine = ScriptedEngine::new(vec!["a scripted answer".to_string()]);
        engine.attach(store.clone());

        engine.execute(request(vec![Message::user("first")])).await.unwrap();
        engine.execute(request(vec![Message::user("second")])).await.unwrap();

        let store = store.read().await;
        let texts: Vec<&str> = store.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["a scripted answer", "Echo: second"]);
        assert!(store.messages().iter().all(|m| m.is_complete()));
    }

    #[tokio::test]
    async fn test_detached_engine_fails() {
        let engine = ScriptedEngine::new(Vec::new());
        assert!(engine.execute(request(Vec::new())).await.is_err());
    }
}
