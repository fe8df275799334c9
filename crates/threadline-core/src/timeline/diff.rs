use crate::message::{Message, MessageRole};
use serde::{Deserialize, Serialize};

/// Thresholds for showing a regenerated answer as a diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffPolicy {
    /// Both texts must be longer than this many characters.
    pub min_chars: usize,
    /// Neither text may be this many times longer than the other.
    /// `0` turns the length comparison off.
    pub max_length_ratio: usize,
}

impl Default for DiffPolicy {
    fn default() -> Self {
        Self {
            min_chars: 80,
            max_length_ratio: 3,
        }
    }
}

/// The newest assistant message paired with the text it should be diffed against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffPair {
    pub target_id: String,
    pub previous_text: String,
}

/// Decides whether the newest assistant message is rendered as a diff against
/// the one before it.
///
/// Only the two most recent assistant messages are considered. No pair is
/// produced while the newest one is still streaming, when either text is too
/// short, or when their lengths differ by `max_length_ratio` or more.
pub fn find_diff_target(messages: &[Message], policy: &DiffPolicy) -> Option<DiffPair> {
    let mut assistants = messages
        .iter()
        .rev()
        .filter(|m| m.role == MessageRole::Assistant);
    let current = assistants.next()?;
    let previous = assistants.next()?;

    if current.is_streaming() || current.text.is_empty() || previous.text.is_empty() {
        return None;
    }

    let current_len = current.char_len();
    let previous_len = previous.char_len();
    if current_len <= policy.min_chars || previous_len <= policy.min_chars {
        return None;
    }

    let ratio = policy.max_length_ratio;
    if outside_ratio(current_len, previous_len, ratio)
        || outside_ratio(previous_len, current_len, ratio)
    {
        return None;
    }

    Some(DiffPair {
        target_id: current.id.clone(),
        previous_text: previous.text.clone(),
    })
}

/// True when `len * ratio <= other`, i.e. `other` is at least `ratio` times longer.
///
/// A product past `usize::MAX` is larger than any text length.
fn outside_ratio(len: usize, other: usize, ratio: usize) -> bool {
    if ratio == 0 {
        return false;
    }
    len.checked_mul(ratio).is_some_and(|scaled| scaled <= other)
}
