use crate::error::Result;
use crate::message::Message;
use async_trait::async_trait;
use serde::Serialize;

/// An ordered history handed to the execution engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionRequest {
    pub conversation_id: String,
    pub history: Vec<Message>,
    /// Run with the alternate multi-candidate strategy. Opaque to the engine
    /// core; only forwarded.
    pub multi_candidate: bool,
}

/// Outbound engine that runs the assistant on a history.
///
/// Results are appended to the conversation by the engine itself once the run
/// completes; callers do not inspect the outcome beyond logging failures.
#[async_trait]
pub trait ExecutionEngine: Send + Sync {
    async fn execute(&self, request: ExecutionRequest) -> Result<()>;
}

/// Request to render a diagram from a message's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagramRequest {
    pub conversation_id: String,
    pub message_id: String,
    pub text: String,
}

/// Outbound diagram collaborator. Fire-and-forget.
pub trait DiagramRequester: Send + Sync {
    fn request_diagram(&self, request: DiagramRequest);
}
