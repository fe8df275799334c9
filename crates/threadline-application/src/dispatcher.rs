//! Timeline actions driven by message ids.
//!
//! Every action resolves its target against the store's current state. A
//! missing id (for instance a message deleted by a concurrent gesture) turns
//! the action into a logged no-op: no history mutation, no execution.

use serde::Serialize;
use std::sync::Arc;
use threadline_core::ThreadlineError;
use threadline_core::conversation::SharedMessageStore;
use threadline_core::message::Message;
use threadline_core::port::{
    BranchCreator, BranchRequest, DiagramRequest, DiagramRequester, ExecutionEngine,
    ExecutionRequest,
};

/// What happened to a dispatched action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionOutcome {
    /// The action ran (collaborator failures are logged, not reported).
    Applied,
    /// The target was missing; nothing happened.
    Ignored,
}

impl ActionOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ActionOutcome::Applied)
    }
}

/// Implements branch, truncate, restart-from and the single-message actions
/// for one conversation.
pub struct TimelineDispatcher {
    store: SharedMessageStore,
    execution_engine: Arc<dyn ExecutionEngine>,
    branch_creator: Arc<dyn BranchCreator>,
    diagram_requester: Option<Arc<dyn DiagramRequester>>,
}

impl TimelineDispatcher {
    pub fn new(
        store: SharedMessageStore,
        execution_engine: Arc<dyn ExecutionEngine>,
        branch_creator: Arc<dyn BranchCreator>,
    ) -> Self {
        Self {
            store,
            execution_engine,
            branch_creator,
            diagram_requester: None,
        }
    }

    pub fn with_diagram_requester(mut self, requester: Arc<dyn DiagramRequester>) -> Self {
        self.diagram_requester = Some(requester);
        self
    }

    /// Asks the branch creator for a new conversation seeded with the prefix
    /// ending at `message_id`. The local timeline is not touched.
    pub async fn branch(&self, message_id: &str) -> ActionOutcome {
        let request = {
            let store = self.store.read().await;
            match store.prefix(message_id, 0) {
                Ok(history) => BranchRequest {
                    conversation_id: store.conversation_id().to_string(),
                    message_id: message_id.to_string(),
                    history,
                },
                Err(e) => return ignored("branch", &e),
            }
        };

        tracing::info!(
            "[TimelineDispatcher] Branching {} at {} ({} messages)",
            request.conversation_id,
            message_id,
            request.history.len()
        );

        if let Err(e) = self.branch_creator.branch(request).await {
            tracing::warn!("[TimelineDispatcher] Branch creator failed: {}", e);
        }
        ActionOutcome::Applied
    }

    /// Keeps everything up to and including `message_id`. Display-only edit,
    /// nothing is re-executed.
    pub async fn truncate(&self, message_id: &str) -> ActionOutcome {
        let mut store = self.store.write().await;
        match store.replace_range(message_id, 0) {
            Ok(removed) => {
                tracing::info!(
                    "[TimelineDispatcher] Truncated {} at {}: {} messages removed",
                    store.conversation_id(),
                    message_id,
                    removed
                );
                ActionOutcome::Applied
            }
            Err(e) => ignored("truncate", &e),
        }
    }

    /// Re-executes the assistant on the prefix ending `offset` messages after
    /// `message_id`.
    ///
    /// The store is not truncated here; the execution engine appends its
    /// result once the run completes.
    pub async fn restart_from(
        &self,
        message_id: &str,
        offset: isize,
        multi_candidate: bool,
    ) -> ActionOutcome {
        let request = {
            let store = self.store.read().await;
            match store.prefix(message_id, offset) {
                Ok(history) => ExecutionRequest {
                    conversation_id: store.conversation_id().to_string(),
                    history,
                    multi_candidate,
                },
                Err(e) => return ignored("restart_from", &e),
            }
        };

        tracing::info!(
            "[TimelineDispatcher] Restarting {} from {} (offset {}, multi_candidate={}): {} messages",
            request.conversation_id,
            message_id,
            offset,
            multi_candidate,
            request.history.len()
        );

        self.execute(request).await;
        ActionOutcome::Applied
    }

    /// Appends `text` as a new user message and executes the whole timeline.
    pub async fn run_example(&self, text: &str) -> ActionOutcome {
        let request = {
            let mut store = self.store.write().await;
            if let Err(e) = store.append(Message::user(text)) {
                return ignored("run_example", &e);
            }
            ExecutionRequest {
                conversation_id: store.conversation_id().to_string(),
                history: store.messages().to_vec(),
                multi_candidate: false,
            }
        };

        tracing::info!(
            "[TimelineDispatcher] Running example in {} ({} messages)",
            request.conversation_id,
            request.history.len()
        );

        self.execute(request).await;
        ActionOutcome::Applied
    }

    pub async fn delete_message(&self, message_id: &str) -> ActionOutcome {
        let mut store = self.store.write().await;
        if store.delete_by_id(message_id) {
            ActionOutcome::Applied
        } else {
            ignored("delete_message", &ThreadlineError::id_not_found(message_id))
        }
    }

    pub async fn edit_message(&self, message_id: &str, text: &str) -> ActionOutcome {
        let mut store = self.store.write().await;
        match store.edit_text(message_id, text) {
            Ok(()) => ActionOutcome::Applied,
            Err(e) => ignored("edit_message", &e),
        }
    }

    /// Forwards a diagram request for a message's text, if a requester is set.
    pub async fn request_diagram(&self, message_id: &str, text: &str) -> ActionOutcome {
        let conversation_id = {
            let store = self.store.read().await;
            if !store.contains(message_id) {
                return ignored(
                    "request_diagram",
                    &ThreadlineError::id_not_found(message_id),
                );
            }
            store.conversation_id().to_string()
        };

        let Some(requester) = &self.diagram_requester else {
            tracing::debug!("[TimelineDispatcher] request_diagram: no diagram requester configured");
            return ActionOutcome::Ignored;
        };

        requester.request_diagram(DiagramRequest {
            conversation_id,
            message_id: message_id.to_string(),
            text: text.to_string(),
        });
        ActionOutcome::Applied
    }

    /// Runs the engine without holding the store lock, so the engine can
    /// append its result.
    async fn execute(&self, request: ExecutionRequest) {
        let conversation_id = request.conversation_id.clone();
        if let Err(e) = self.execution_engine.execute(request).await {
            tracing::warn!(
                "[TimelineDispatcher] Execution failed for {}: {}",
                conversation_id,
                e
            );
        }
    }
}

fn ignored(action: &str, error: &ThreadlineError) -> ActionOutcome {
    tracing::debug!("[TimelineDispatcher] {} ignored: {}", action, error);
    ActionOutcome::Ignored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use threadline_core::message::MessageRole;

    struct Fixture {
        store: SharedMessageStore,
        engine: Arc<RecordingExecutionEngine>,
        brancher: Arc<RecordingBranchCreator>,
        dispatcher: TimelineDispatcher,
    }

    fn fixture_with_engine(engine: RecordingExecutionEngine) -> Fixture {
        let store = shared_store(&["m1", "m2", "m3", "m4"]);
        let engine = Arc::new(engine);
        let brancher = Arc::new(RecordingBranchCreator::default());
        let dispatcher = TimelineDispatcher::new(store.clone(), engine.clone(), brancher.clone());
        Fixture {
            store,
            engine,
            brancher,
            dispatcher,
        }
    }

    fn fixture() -> Fixture {
        fixture_with_engine(RecordingExecutionEngine::default())
    }

    #[tokio::test]
    async fn test_truncate_keeps_prefix_including_anchor() {
        let f = fixture();
        assert_eq!(f.dispatcher.truncate("m2").await, ActionOutcome::Applied);
        assert_eq!(store_ids(&f.store).await, vec!["m1", "m2"]);
        assert!(f.engine.requests().is_empty());
    }

    #[tokio::test]
    async fn test_truncate_missing_id_is_noop() {
        let f = fixture();
        let before = f.store.read().await.snapshot();

        assert_eq!(f.dispatcher.truncate("ghost").await, ActionOutcome::Ignored);

        let after = f.store.read().await.snapshot();
        assert_eq!(after, before);
    }

    #[tokio::test]
    async fn test_branch_forwards_prefix_without_mutating() {
        let f = fixture();
        assert!(f.dispatcher.branch("m3").await.is_applied());

        let requests = f.brancher.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].conversation_id, "conv-1");
        assert_eq!(requests[0].message_id, "m3");
        assert_eq!(history_ids(&requests[0].history), vec!["m1", "m2", "m3"]);
        assert_eq!(store_ids(&f.store).await.len(), 4);
    }

    #[tokio::test]
    async fn test_branch_missing_id_sends_nothing() {
        let f = fixture();
        assert_eq!(f.dispatcher.branch("ghost").await, ActionOutcome::Ignored);
        assert!(f.brancher.requests().is_empty());
    }

    #[tokio::test]
    async fn test_restart_from_forwards_offset_prefix_and_flag() {
        let f = fixture();
        f.dispatcher.restart_from("m2", 1, true).await;
        f.dispatcher.restart_from("m2", 0, false).await;
        f.dispatcher.restart_from("m2", -1, false).await;

        let requests = f.engine.requests();
        assert_eq!(history_ids(&requests[0].history), vec!["m1", "m2", "m3"]);
        assert!(requests[0].multi_candidate);
        assert_eq!(history_ids(&requests[1].history), vec!["m1", "m2"]);
        assert!(!requests[1].multi_candidate);
        assert_eq!(history_ids(&requests[2].history), vec!["m1"]);

        // restart never truncates the store by itself
        assert_eq!(store_ids(&f.store).await.len(), 4);
    }

    #[tokio::test]
    async fn test_restart_from_missing_id_triggers_no_execution() {
        let f = fixture();
        assert_eq!(
            f.dispatcher.restart_from("ghost", 0, false).await,
            ActionOutcome::Ignored
        );
        assert!(f.engine.requests().is_empty());
    }

    #[tokio::test]
    async fn test_run_example_appends_user_message_then_executes() {
        let f = fixture();
        f.dispatcher.run_example("write a haiku").await;

        let store = f.store.read().await;
        let last = store.messages().last().unwrap();
        assert_eq!(last.role, MessageRole::User);
        assert_eq!(last.text, "write a haiku");

        let requests = f.engine.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].history.len(), 5);
        assert_eq!(requests[0].history.last().unwrap().id, last.id);
        assert!(!requests[0].multi_candidate);
    }

    #[tokio::test]
    async fn test_execution_failure_is_swallowed() {
        let f = fixture_with_engine(RecordingExecutionEngine::failing());
        assert_eq!(
            f.dispatcher.restart_from("m4", 0, false).await,
            ActionOutcome::Applied
        );
        assert_eq!(f.engine.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_and_edit_single_messages() {
        let f = fixture();
        assert!(f.dispatcher.delete_message("m1").await.is_applied());
        assert_eq!(
            f.dispatcher.delete_message("m1").await,
            ActionOutcome::Ignored
        );

        assert!(f.dispatcher.edit_message("m2", "rewritten").await.is_applied());
        assert_eq!(
            f.dispatcher.edit_message("ghost", "x").await,
            ActionOutcome::Ignored
        );

        let store = f.store.read().await;
        assert_eq!(store.get("m2").unwrap().text, "rewritten");
        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn test_request_diagram_requires_requester_and_message() {
        let f = fixture();
        assert_eq!(
            f.dispatcher.request_diagram("m2", "graph").await,
            ActionOutcome::Ignored
        );

        let requester = Arc::new(RecordingDiagramRequester::default());
        let dispatcher = TimelineDispatcher::new(f.store.clone(), f.engine.clone(), f.brancher.clone())
            .with_diagram_requester(requester.clone());

        assert!(dispatcher.request_diagram("m2", "graph").await.is_applied());
        assert_eq!(
            dispatcher.request_diagram("ghost", "graph").await,
            ActionOutcome::Ignored
        );

        let requests = requester.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].message_id, "m2");
        assert_eq!(requests[0].text, "graph");
    }

    #[tokio::test]
    async fn test_mutations_in_same_tick_apply_in_order() {
        let f = fixture();
        f.dispatcher.truncate("m3").await;
        f.dispatcher.delete_message("m2").await;
        // m4 was removed by the truncate, so this is a no-op
        assert_eq!(f.dispatcher.truncate("m4").await, ActionOutcome::Ignored);

        assert_eq!(store_ids(&f.store).await, vec!["m1", "m3"]);
    }
}
