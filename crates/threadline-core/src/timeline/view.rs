use crate::message::{Message, MessageRole};
use serde::{Deserialize, Serialize};

/// Decides which messages of a timeline are displayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewFilter {
    pub show_system_messages: bool,
}

/// A displayed message with its position in the filtered sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleMessage<'a> {
    pub message: &'a Message,
    /// Index within the filtered sequence.
    pub index: usize,
    /// Last element of the filtered sequence.
    pub is_bottom: bool,
}

impl ViewFilter {
    pub fn new(show_system_messages: bool) -> Self {
        Self {
            show_system_messages,
        }
    }

    pub fn is_visible(&self, message: &Message) -> bool {
        message.role != MessageRole::System || self.show_system_messages
    }

    /// Returns the displayed subsequence, order preserved.
    pub fn apply<'a>(&self, messages: &'a [Message]) -> Vec<VisibleMessage<'a>> {
        let visible: Vec<&Message> = messages.iter().filter(|m| self.is_visible(m)).collect();
        let count = visible.len();
        visible
            .into_iter()
            .enumerate()
            .map(|(index, message)| VisibleMessage {
                message,
                index,
                is_bottom: index + 1 == count,
            })
            .collect()
    }

    /// Ids of the displayed messages, in order.
    pub fn visible_ids<'a>(&self, messages: &'a [Message]) -> Vec<&'a str> {
        messages
            .iter()
            .filter(|m| self.is_visible(m))
            .map(|m| m.id.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timeline() -> Vec<Message> {
        vec![
            Message::with_id("s", MessageRole::System, "you are helpful"),
            Message::with_id("u", MessageRole::User, "hi"),
            Message::with_id("a", MessageRole::Assistant, "hello"),
        ]
    }

    #[test]
    fn test_system_messages_hidden_by_default() {
        let messages = timeline();
        let visible = ViewFilter::default().apply(&messages);

        assert_eq!(
            visible.iter().map(|v| v.message.id.as_str()).collect::<Vec<_>>(),
            vec!["u", "a"]
        );
        assert_eq!(visible[0].index, 0);
        assert!(!visible[0].is_bottom);
        assert!(visible[1].is_bottom);
    }

    #[test]
    fn test_system_messages_shown_when_enabled() {
        let messages = timeline();
        let filter = ViewFilter::new(true);

        assert_eq!(filter.visible_ids(&messages), vec!["s", "u", "a"]);
        assert!(filter.apply(&messages)[2].is_bottom);
    }

    #[test]
    fn test_empty_timeline_has_no_bottom() {
        assert!(ViewFilter::default().apply(&[]).is_empty());
    }
}
