//! Message domain module.
//!
//! # Module Structure
//!
//! - `model`: Timeline message types (`Message`, `MessageRole`, `MessageState`)
//! - `token`: Token accounting collaborator (`TokenCounter`)

mod model;
mod token;

pub use model::{Message, MessageRole, MessageState};
pub use token::{ApproxTokenCounter, TokenCounter};
