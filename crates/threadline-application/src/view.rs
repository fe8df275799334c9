//! The rendered timeline handed to the presentation layer.

use crate::media::BusyFlags;
use serde::Serialize;
use threadline_core::config::TimelineConfig;
use threadline_core::conversation::MessageStore;
use threadline_core::message::Message;
use threadline_core::port::Ephemeral;
use threadline_core::timeline::{SelectionController, ViewFilter, find_diff_target};

/// One displayed message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    pub message: Message,
    pub is_bottom: bool,
    /// Present only on the diff target, outside selection mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_previous_text: Option<String>,
    /// Present only in selection mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<bool>,
}

/// Header data for the selection mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionSummary {
    pub has_selected: bool,
    pub selected_count: usize,
    /// History tokens of the whole conversation.
    pub sum_tokens: usize,
    /// Context window minus history tokens, when the context size is known.
    pub remaining_tokens: Option<i64>,
}

/// Everything the host needs to draw the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineView {
    pub conversation_id: String,
    pub entries: Vec<TimelineEntry>,
    /// Appended after the entries; not part of the timeline.
    pub ephemerals: Vec<Ephemeral>,
    pub token_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<SelectionSummary>,
    pub is_speaking: bool,
    pub is_imagining: bool,
}

impl TimelineView {
    pub fn entry(&self, message_id: &str) -> Option<&TimelineEntry> {
        self.entries.iter().find(|e| e.message.id == message_id)
    }

    pub fn diff_target(&self) -> Option<&TimelineEntry> {
        self.entries.iter().find(|e| e.diff_previous_text.is_some())
    }
}

/// Derives the view from the store's current state.
pub fn render_timeline(
    store: &MessageStore,
    filter: ViewFilter,
    config: &TimelineConfig,
    selection: &SelectionController,
    ephemerals: Vec<Ephemeral>,
    flags: &BusyFlags,
) -> TimelineView {
    let selecting = selection.is_active();
    let diff = if selecting {
        None
    } else {
        find_diff_target(store.messages(), &config.diff)
    };

    let entries = filter
        .apply(store.messages())
        .into_iter()
        .map(|visible| {
            let message = visible.message;
            let diff_previous_text = diff
                .as_ref()
                .filter(|pair| pair.target_id == message.id)
                .map(|pair| pair.previous_text.clone());
            TimelineEntry {
                message: message.clone(),
                is_bottom: visible.is_bottom,
                diff_previous_text,
                selected: selecting.then(|| selection.is_selected(&message.id)),
            }
        })
        .collect();

    let summary = selecting.then(|| SelectionSummary {
        has_selected: selection.has_selected(),
        selected_count: selection.len(),
        sum_tokens: store.token_count(),
        remaining_tokens: config.remaining_tokens(store.token_count()),
    });

    TimelineView {
        conversation_id: store.conversation_id().to_string(),
        entries,
        ephemerals,
        token_count: store.token_count(),
        selection: summary,
        is_speaking: flags.is_speaking(),
        is_imagining: flags.is_imagining(),
    }
}
