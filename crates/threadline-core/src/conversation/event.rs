use crate::message::Message;
use serde::Serialize;

/// A completed mutation of a timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimelineChange {
    Appended { message_id: String },
    /// Everything after the resolved end of the range was dropped.
    Truncated { anchor_id: String, removed: usize },
    Deleted { message_id: String },
    /// Text replaced or extended (edit or streamed chunk).
    Updated { message_id: String },
    /// A streaming message finished.
    Completed { message_id: String },
}

/// Subscriber notified after every completed store mutation.
///
/// Observers receive the full message list as it stands after the change and
/// must not assume any state was kept from earlier notifications.
///
/// Notifications run while the store's write lock is held. Observers must not
/// lock the store themselves; read the `messages` argument instead.
pub trait TimelineObserver: Send + Sync {
    fn on_timeline_changed(&self, change: &TimelineChange, messages: &[Message]);
}
