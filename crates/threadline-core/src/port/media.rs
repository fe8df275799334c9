use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Text-to-speech engine.
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    async fn speak(&self, text: &str) -> Result<()>;
}

/// Text-to-image engine.
#[async_trait]
pub trait ImageEngine: Send + Sync {
    async fn imagine(&self, conversation_id: &str, text: &str) -> Result<()>;
}

/// Capability flags as currently reported by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    pub can_imagine: bool,
    pub can_speak: bool,
}

/// Inbound capability flags. Queried per action, never cached.
pub trait CapabilityProbe: Send + Sync {
    fn capabilities(&self) -> Capabilities;
}

impl CapabilityProbe for Capabilities {
    fn capabilities(&self) -> Capabilities {
        *self
    }
}

/// Settings pages the host can be asked to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferencesTab {
    /// Image generation settings.
    Draw,
    /// Speech settings.
    Voice,
}

impl fmt::Display for PreferencesTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreferencesTab::Draw => write!(f, "draw"),
            PreferencesTab::Voice => write!(f, "voice"),
        }
    }
}

/// Redirect target used when a capability is missing.
pub trait PreferencesNavigator: Send + Sync {
    fn open_preferences_tab(&self, tab: PreferencesTab);
}
