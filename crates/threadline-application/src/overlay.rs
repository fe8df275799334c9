//! Ephemeral status notices appended after the rendered timeline.

use std::sync::Arc;
use threadline_core::port::{Ephemeral, EphemeralSource};

/// Pulls the transient notices for one conversation.
///
/// The notices only ever reach the rendered view; they never enter the
/// message store and never count towards its tokens.
pub struct EphemeralOverlay {
    conversation_id: String,
    source: Arc<dyn EphemeralSource>,
}

impl EphemeralOverlay {
    pub fn new(conversation_id: impl Into<String>, source: Arc<dyn EphemeralSource>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            source,
        }
    }

    pub fn current(&self) -> Vec<Ephemeral> {
        self.source.ephemerals(&self.conversation_id)
    }
}
