//! Recording collaborators shared by the unit tests of this crate.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use threadline_core::conversation::{MessageStore, SharedMessageStore};
use threadline_core::error::{Result, ThreadlineError};
use threadline_core::message::{ApproxTokenCounter, Message, MessageRole};
use threadline_core::port::{
    BranchCreator, BranchRequest, DiagramRequest, DiagramRequester, ExecutionEngine,
    ExecutionRequest,
};

pub fn shared_store(ids: &[&str]) -> SharedMessageStore {
    let mut store = MessageStore::new("conv-1", Arc::new(ApproxTokenCounter));
    for (i, id) in ids.iter().enumerate() {
        let role = if i % 2 == 0 {
            MessageRole::User
        } else {
            MessageRole::Assistant
        };
        store
            .append(Message::with_id(*id, role, format!("text of {}", id)))
            .unwrap();
    }
    store.into_shared()
}

pub async fn store_ids(store: &SharedMessageStore) -> Vec<String> {
    store
        .read()
        .await
        .messages()
        .iter()
        .map(|m| m.id.clone())
        .collect()
}

pub fn history_ids(history: &[Message]) -> Vec<&str> {
    history.iter().map(|m| m.id.as_str()).collect()
}

#[derive(Default)]
pub struct RecordingExecutionEngine {
    pub requests: Mutex<Vec<ExecutionRequest>>,
    pub fail: bool,
}

impl RecordingExecutionEngine {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn requests(&self) -> Vec<ExecutionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExecutionEngine for RecordingExecutionEngine {
    async fn execute(&self, request: ExecutionRequest) -> Result<()> {
        self.requests.lock().unwrap().push(request);
        if self.fail {
            return Err(ThreadlineError::execution("model unavailable"));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingBranchCreator {
    pub requests: Mutex<Vec<BranchRequest>>,
}

impl RecordingBranchCreator {
    pub fn requests(&self) -> Vec<BranchRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl BranchCreator for RecordingBranchCreator {
    async fn branch(&self, request: BranchRequest) -> Result<()> {
        self.requests.lock().unwrap().push(request);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingDiagramRequester {
    pub requests: Mutex<Vec<DiagramRequest>>,
}

impl DiagramRequester for RecordingDiagramRequester {
    fn request_diagram(&self, request: DiagramRequest) {
        self.requests.lock().unwrap().push(request);
    }
}
