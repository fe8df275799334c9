//! Domain layer for Threadline.
//!
//! Owns the canonical message order of a conversation (`MessageStore`), the
//! pure derived views over it (`ViewFilter`, `find_diff_target`), the bulk
//! selection state (`SelectionController`) and the collaborator interfaces the
//! application layer drives.

pub mod config;
pub mod conversation;
pub mod error;
pub mod message;
pub mod port;
pub mod timeline;

// Re-export common error type
pub use error::{Result, ThreadlineError};
