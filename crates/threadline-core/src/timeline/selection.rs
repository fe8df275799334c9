use crate::conversation::MessageStore;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Whether bulk selection is currently offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    #[default]
    Inactive,
    Active,
}

/// Tracks the ids picked for a bulk action during one selection session.
///
/// The set lives only while the mode is `Active`: leaving the mode discards it,
/// and every selection gesture made while inactive is ignored. Ids are not
/// checked against the store; deletion tolerates ids that are already gone.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    mode: SelectionMode,
    selected: HashSet<String>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn is_active(&self) -> bool {
        self.mode == SelectionMode::Active
    }

    /// Host toggle. Leaving the active mode clears the selection unconditionally.
    pub fn set_active(&mut self, active: bool) {
        if active {
            self.mode = SelectionMode::Active;
        } else {
            self.mode = SelectionMode::Inactive;
            self.selected.clear();
        }
    }

    pub fn enter(&mut self) {
        self.set_active(true);
    }

    pub fn exit(&mut self) {
        self.set_active(false);
    }

    /// Selects every given id when `on`, otherwise empties the selection.
    pub fn select_all<'a, I>(&mut self, on: bool, visible_ids: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        if !self.is_active() {
            tracing::debug!("[SelectionController] select_all ignored: selection mode inactive");
            return;
        }

        self.selected.clear();
        if on {
            self.selected
                .extend(visible_ids.into_iter().map(str::to_string));
        }
    }

    pub fn toggle(&mut self, id: &str, on: bool) {
        if !self.is_active() {
            tracing::debug!(
                "[SelectionController] toggle({}) ignored: selection mode inactive",
                id
            );
            return;
        }

        if on {
            self.selected.insert(id.to_string());
        } else {
            self.selected.remove(id);
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn has_selected(&self) -> bool {
        !self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected ids in no particular order.
    pub fn selected_ids(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    /// Deletes every selected message, then clears the selection and leaves
    /// selection mode.
    ///
    /// Returns how many messages were actually removed.
    pub fn delete_selected(&mut self, store: &mut MessageStore) -> usize {
        if !self.is_active() {
            tracing::debug!("[SelectionController] delete_selected ignored: selection mode inactive");
            return 0;
        }

        let removed = self
            .selected
            .drain()
            .filter(|id| store.delete_by_id(id))
            .count();

        tracing::info!(
            "[SelectionController] Deleted {} selected messages from {}",
            removed,
            store.conversation_id()
        );

        self.exit();
        removed
    }
}
