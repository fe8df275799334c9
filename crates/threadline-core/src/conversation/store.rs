use super::event::{TimelineChange, TimelineObserver};
use super::model::Conversation;
use crate::error::{Result, ThreadlineError};
use crate::message::{Message, MessageState, TokenCounter};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A store shared between the action dispatcher and asynchronous collaborators.
///
/// One logical writer at a time; readers never mutate.
pub type SharedMessageStore = Arc<RwLock<MessageStore>>;

/// The canonical ordered message list of one conversation.
///
/// `MessageStore` is responsible for:
/// - Keeping message ids unique
/// - Appending only at the tail
/// - Keeping `token_count` equal to the sum of message contributions
/// - Notifying observers once per completed mutation
///
/// Every mutation runs to completion before it returns, so a partially applied
/// change is never observable.
pub struct MessageStore {
    conversation_id: String,
    messages: Vec<Message>,
    token_count: usize,
    counter: Arc<dyn TokenCounter>,
    observers: Vec<Arc<dyn TimelineObserver>>,
}

impl MessageStore {
    /// Creates an empty store for the given conversation.
    pub fn new(conversation_id: impl Into<String>, counter: Arc<dyn TokenCounter>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            messages: Vec::new(),
            token_count: 0,
            counter,
            observers: Vec::new(),
        }
    }

    /// Loads a conversation snapshot, re-tokenizing every message.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateId` if the snapshot repeats an id.
    pub fn from_conversation(
        conversation: Conversation,
        counter: Arc<dyn TokenCounter>,
    ) -> Result<Self> {
        let mut seen = HashSet::with_capacity(conversation.messages.len());
        for message in &conversation.messages {
            if !seen.insert(message.id.as_str()) {
                return Err(ThreadlineError::duplicate_id(message.id.clone()));
            }
        }

        let mut messages = conversation.messages;
        let mut token_count = 0;
        for message in &mut messages {
            message.token_count = counter.count(message);
            token_count += message.token_count;
        }

        Ok(Self {
            conversation_id: conversation.id,
            messages,
            token_count,
            counter,
            observers: Vec::new(),
        })
    }

    pub fn into_shared(self) -> SharedMessageStore {
        Arc::new(RwLock::new(self))
    }

    /// Registers an observer notified after each completed mutation.
    pub fn subscribe(&mut self, observer: Arc<dyn TimelineObserver>) {
        self.observers.push(observer);
    }

    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// O(1) read of the maintained aggregate.
    pub fn token_count(&self) -> usize {
        self.token_count
    }

    pub fn get(&self, id: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.messages.iter().position(|m| m.id == id)
    }

    /// Returns a snapshot suitable for handing to collaborators.
    pub fn snapshot(&self) -> Conversation {
        Conversation {
            id: self.conversation_id.clone(),
            messages: self.messages.clone(),
            token_count: self.token_count,
        }
    }

    /// Copies the prefix that `replace_range(anchor_id, offset)` would keep,
    /// without mutating the store.
    pub fn prefix(&self, anchor_id: &str, offset: isize) -> Result<Vec<Message>> {
        let end = self.range_end(anchor_id, offset)?;
        Ok(self.messages[..end].to_vec())
    }

    /// Appends a message at the tail.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateId` and leaves the store unchanged if the id is taken.
    pub fn append(&mut self, mut message: Message) -> Result<()> {
        if self.contains(&message.id) {
            tracing::warn!(
                "[MessageStore] Rejected duplicate id {} in conversation {}",
                message.id,
                self.conversation_id
            );
            return Err(ThreadlineError::duplicate_id(message.id));
        }

        message.token_count = self.counter.count(&message);
        self.token_count += message.token_count;
        let message_id = message.id.clone();
        self.messages.push(message);

        self.notify(TimelineChange::Appended { message_id });
        Ok(())
    }

    /// Truncates the timeline to the prefix ending `offset` positions after
    /// `anchor_id` (inclusive).
    ///
    /// Offset `0` ends exactly at the anchor; a positive offset retains that many
    /// extra messages; a negative offset ends before it. An end before the first
    /// message empties the timeline, an end past the tail removes nothing.
    ///
    /// Returns the number of removed messages.
    ///
    /// # Errors
    ///
    /// Returns `IdNotFound` if the anchor is absent; nothing is removed.
    pub fn replace_range(&mut self, anchor_id: &str, offset: isize) -> Result<usize> {
        let end = self.range_end(anchor_id, offset)?;
        let removed = self.messages.split_off(end);
        if removed.is_empty() {
            return Ok(0);
        }

        let removed_tokens: usize = removed.iter().map(|m| m.token_count).sum();
        self.token_count -= removed_tokens;

        tracing::debug!(
            "[MessageStore] Truncated {} after {} (offset {}): removed {} messages, {} tokens",
            self.conversation_id,
            anchor_id,
            offset,
            removed.len(),
            removed_tokens
        );

        self.notify(TimelineChange::Truncated {
            anchor_id: anchor_id.to_string(),
            removed: removed.len(),
        });
        Ok(removed.len())
    }

    /// Removes exactly one message. Returns `false` if it was already gone.
    pub fn delete_by_id(&mut self, id: &str) -> bool {
        let Some(position) = self.position(id) else {
            tracing::debug!("[MessageStore] delete_by_id: {} not present", id);
            return false;
        };

        let removed = self.messages.remove(position);
        self.token_count -= removed.token_count;

        self.notify(TimelineChange::Deleted {
            message_id: removed.id,
        });
        true
    }

    /// Replaces the text of a message and stamps `updated_at`.
    pub fn edit_text(&mut self, id: &str, text: impl Into<String>) -> Result<()> {
        let text = text.into();
        self.update_message(id, |message| {
            message.text = text;
            message.updated_at = Some(Utc::now());
        })?;

        self.notify(TimelineChange::Updated {
            message_id: id.to_string(),
        });
        Ok(())
    }

    /// Extends a message with a streamed chunk.
    pub fn append_text(&mut self, id: &str, chunk: &str) -> Result<()> {
        self.update_message(id, |message| message.text.push_str(chunk))?;

        self.notify(TimelineChange::Updated {
            message_id: id.to_string(),
        });
        Ok(())
    }

    /// Marks a streaming message as complete.
    pub fn complete(&mut self, id: &str) -> Result<()> {
        self.update_message(id, |message| message.state = MessageState::Complete)?;

        self.notify(TimelineChange::Completed {
            message_id: id.to_string(),
        });
        Ok(())
    }

    /// Exclusive end index of the prefix kept by `replace_range`.
    fn range_end(&self, anchor_id: &str, offset: isize) -> Result<usize> {
        let position = self
            .position(anchor_id)
            .ok_or_else(|| ThreadlineError::id_not_found(anchor_id))?;

        let end = (position as isize).saturating_add(offset).saturating_add(1);
        Ok(end.clamp(0, self.messages.len() as isize) as usize)
    }

    /// Applies `update` to one message and re-tokenizes it.
    fn update_message<F>(&mut self, id: &str, update: F) -> Result<()>
    where
        F: FnOnce(&mut Message),
    {
        let counter = Arc::clone(&self.counter);
        let message = self
            .messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| ThreadlineError::id_not_found(id))?;

        let before = message.token_count;
        update(message);
        message.token_count = counter.count(message);

        self.token_count = self.token_count - before + message.token_count;
        Ok(())
    }

    fn notify(&self, change: TimelineChange) {
        debug_assert_eq!(
            self.token_count,
            self.messages.iter().map(|m| m.token_count).sum::<usize>()
        );
        for observer in &self.observers {
            observer.on_timeline_changed(&change, &self.messages);
        }
    }
}

impl std::fmt::Debug for MessageStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageStore")
            .field("conversation_id", &self.conversation_id)
            .field("messages", &self.messages.len())
            .field("token_count", &self.token_count)
            .field("observers", &self.observers.len())
            .finish()
    }
}
