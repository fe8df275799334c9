//! Adapters for Threadline: configuration loading, platform paths and an
//! in-memory conversation repository.

pub mod config_service;
pub mod conversation_repository;
pub mod paths;

pub use crate::config_service::ConfigService;
pub use crate::conversation_repository::InMemoryConversationRepository;
pub use crate::paths::ThreadlinePaths;
