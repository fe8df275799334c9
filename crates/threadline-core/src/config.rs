//! Timeline configuration model.

use crate::timeline::{DiffPolicy, ViewFilter};
use serde::{Deserialize, Serialize};

/// Root configuration, loaded from `config.toml` by the infrastructure layer.
///
/// Every field has a default so a partial or empty file is valid.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct TimelineConfig {
    /// Display system messages in the timeline.
    pub show_system_messages: bool,
    /// Context window of the active model, in tokens.
    pub context_tokens: Option<usize>,
    pub diff: DiffPolicy,
}

impl TimelineConfig {
    pub fn view_filter(&self) -> ViewFilter {
        ViewFilter::new(self.show_system_messages)
    }

    /// Tokens left in the context window, negative once the history overflows it.
    pub fn remaining_tokens(&self, history_tokens: usize) -> Option<i64> {
        self.context_tokens
            .map(|context| context as i64 - history_tokens as i64)
    }
}
