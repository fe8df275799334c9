//! Publishes derived views to hosts after every store change.

use serde::Serialize;
use std::sync::Arc;
use threadline_core::conversation::{TimelineChange, TimelineObserver};
use threadline_core::message::Message;
use threadline_core::port::DisplayPreferences;
use threadline_core::timeline::{DiffPair, DiffPolicy, ViewFilter, find_diff_target};
use tokio::sync::watch;

/// The filtered order and diff pair recomputed after a mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DerivedView {
    /// Incremented on every published change.
    pub revision: u64,
    pub visible_ids: Vec<String>,
    pub diff: Option<DiffPair>,
    pub token_count: usize,
    pub last_change: Option<TimelineChange>,
}

/// Store observer that recomputes the view filter and diff targeter and
/// publishes the result on a `watch` channel.
///
/// Recomputation happens from the message list handed over with each change;
/// the only state carried between notifications is the revision counter.
pub struct ViewPublisher {
    preferences: Arc<dyn DisplayPreferences>,
    diff_policy: DiffPolicy,
    sender: watch::Sender<DerivedView>,
}

impl ViewPublisher {
    pub fn new(
        preferences: Arc<dyn DisplayPreferences>,
        diff_policy: DiffPolicy,
    ) -> (Arc<Self>, watch::Receiver<DerivedView>) {
        let (sender, receiver) = watch::channel(DerivedView::default());
        let publisher = Arc::new(Self {
            preferences,
            diff_policy,
            sender,
        });
        (publisher, receiver)
    }

    pub fn subscribe(&self) -> watch::Receiver<DerivedView> {
        self.sender.subscribe()
    }

    /// Publishes a view that is not tied to a store change: the freshly
    /// loaded timeline, or the current one after a display preference flip.
    pub fn republish(&self, messages: &[Message]) {
        self.publish(None, messages);
    }

    fn publish(&self, change: Option<&TimelineChange>, messages: &[Message]) {
        let filter = ViewFilter::new(self.preferences.show_system_messages());
        let revision = self.sender.borrow().revision + 1;
        let view = DerivedView {
            revision,
            visible_ids: filter
                .visible_ids(messages)
                .into_iter()
                .map(str::to_string)
                .collect(),
            diff: find_diff_target(messages, &self.diff_policy),
            token_count: messages.iter().map(|m| m.token_count).sum(),
            last_change: change.cloned(),
        };
        self.sender.send_replace(view);
    }
}

impl TimelineObserver for ViewPublisher {
    fn on_timeline_changed(&self, change: &TimelineChange, messages: &[Message]) {
        self.publish(Some(change), messages);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::DisplaySettings;
    use threadline_core::conversation::MessageStore;
    use threadline_core::message::{ApproxTokenCounter, MessageRole};

    #[test]
    fn test_publishes_after_each_mutation() {
        let settings = Arc::new(DisplaySettings::new(false));
        let (publisher, receiver) = ViewPublisher::new(settings.clone(), DiffPolicy::default());
        let mut store = MessageStore::new("conv-1", Arc::new(ApproxTokenCounter));
        store.subscribe(publisher);

        store
            .append(Message::with_id("s", MessageRole::System, "be nice"))
            .unwrap();
        store
            .append(Message::with_id("a1", MessageRole::Assistant, "a".repeat(120)))
            .unwrap();
        store
            .append(Message::with_id("a2", MessageRole::Assistant, "b".repeat(150)))
            .unwrap();

        let view = receiver.borrow().clone();
        assert_eq!(view.revision, 3);
        assert_eq!(view.visible_ids, vec!["a1", "a2"]);
        assert_eq!(view.diff.as_ref().unwrap().target_id, "a2");
        assert_eq!(view.token_count, store.token_count());
        assert_eq!(
            view.last_change,
            Some(TimelineChange::Appended {
                message_id: "a2".to_string()
            })
        );

        settings.set_show_system_messages(true);
        store.delete_by_id("a1");

        let view = receiver.borrow().clone();
        assert_eq!(view.revision, 4);
        assert_eq!(view.visible_ids, vec!["s", "a2"]);
        assert!(view.diff.is_none());
    }

    #[test]
    fn test_republish_follows_display_preference() {
        let settings = Arc::new(DisplaySettings::new(false));
        let (publisher, receiver) = ViewPublisher::new(settings.clone(), DiffPolicy::default());
        let messages = vec![
            Message::with_id("s", MessageRole::System, "be nice"),
            Message::with_id("u1", MessageRole::User, "hello"),
        ];
        publisher.republish(&messages);
        assert_eq!(receiver.borrow().visible_ids, vec!["u1"]);

        settings.set_show_system_messages(true);
        assert_eq!(receiver.borrow().visible_ids, vec!["u1"]);

        publisher.republish(&messages);
        let view = receiver.borrow().clone();
        assert_eq!(view.revision, 2);
        assert_eq!(view.visible_ids, vec!["s", "u1"]);
        assert!(view.last_change.is_none());
    }
}
