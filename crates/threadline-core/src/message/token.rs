//! Token accounting.
//!
//! The engine never tokenizes by itself; it asks a `TokenCounter` for each
//! message's contribution and keeps the aggregate consistent.

use super::model::Message;

/// External tokenizer collaborator.
pub trait TokenCounter: Send + Sync {
    fn count(&self, message: &Message) -> usize;
}

/// Rough estimate of one token per four characters, rounded up.
///
/// Used when the host does not provide a model-specific tokenizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproxTokenCounter;

impl TokenCounter for ApproxTokenCounter {
    fn count(&self, message: &Message) -> usize {
        message.char_len().div_ceil(4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approx_counter_rounds_up() {
        let counter = ApproxTokenCounter;
        assert_eq!(counter.count(&Message::user("")), 0);
        assert_eq!(counter.count(&Message::user("abc")), 1);
        assert_eq!(counter.count(&Message::user("abcde")), 2);
        assert_eq!(counter.count(&Message::user("abcdefgh")), 2);
    }
}
