//! Error types for Threadline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the timeline engine and its adapters.
///
/// Store mutations report `DuplicateId` and `IdNotFound`; the application layer
/// turns both into logged no-ops so they never reach the host UI as failures.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ThreadlineError {
    /// A message with this id is already part of the timeline.
    #[error("Duplicate message id: '{id}'")]
    DuplicateId { id: String },

    /// The referenced message is not part of the timeline.
    #[error("Message not found: '{id}'")]
    IdNotFound { id: String },

    /// Speech or image generation requested without the capability.
    #[error("Capability unavailable: {capability}")]
    CapabilityUnavailable { capability: String },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON"
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// External execution failed
    #[error("Execution error: {0}")]
    Execution(String),
}

impl ThreadlineError {
    pub fn duplicate_id(id: impl Into<String>) -> Self {
        Self::DuplicateId { id: id.into() }
    }

    pub fn id_not_found(id: impl Into<String>) -> Self {
        Self::IdNotFound { id: id.into() }
    }

    pub fn capability_unavailable(capability: impl Into<String>) -> Self {
        Self::CapabilityUnavailable {
            capability: capability.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Execution error
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into())
    }

    pub fn is_duplicate_id(&self) -> bool {
        matches!(self, Self::DuplicateId { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::IdNotFound { .. })
    }

    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for ThreadlineError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for ThreadlineError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ThreadlineError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for ThreadlineError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Collaborators implemented with anyhow report through this conversion.
impl From<anyhow::Error> for ThreadlineError {
    fn from(err: anyhow::Error) -> Self {
        Self::Execution(err.to_string())
    }
}

/// A type alias for `Result<T, ThreadlineError>`.
pub type Result<T> = std::result::Result<T, ThreadlineError>;
