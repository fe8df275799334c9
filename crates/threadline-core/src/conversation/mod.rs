//! Conversation domain module.
//!
//! # Module Structure
//!
//! - `model`: Conversation snapshot (`Conversation`)
//! - `event`: Change notifications (`TimelineChange`, `TimelineObserver`)
//! - `store`: The canonical ordered timeline (`MessageStore`)

mod event;
mod model;
mod store;

pub use event::{TimelineChange, TimelineObserver};
pub use model::Conversation;
pub use store::{MessageStore, SharedMessageStore};
