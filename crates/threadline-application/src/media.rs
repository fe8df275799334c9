//! Speech and image actions with coarse busy tracking.
//!
//! A busy flag is raised when an action is dispatched and lowered when the
//! engine call finishes, fails or is dropped. The flag is advisory: the host
//! reads it to suppress a second invocation, nothing here refuses one.

use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use threadline_core::error::ThreadlineError;
use threadline_core::port::{
    CapabilityProbe, ImageEngine, PreferencesNavigator, PreferencesTab, SpeechEngine,
};

/// Session-scoped busy state shown by the host.
#[derive(Debug, Default)]
pub struct BusyFlags {
    speaking: AtomicBool,
    imagining: AtomicBool,
}

impl BusyFlags {
    pub fn is_speaking(&self) -> bool {
        self.speaking.load(Ordering::SeqCst)
    }

    pub fn is_imagining(&self) -> bool {
        self.imagining.load(Ordering::SeqCst)
    }
}

/// Raises a flag for as long as it lives.
struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    fn raise(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self { flag }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Result of a speech or image action as seen by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "tab", rename_all = "snake_case")]
pub enum MediaOutcome {
    Completed,
    /// The engine reported an error; already logged.
    Failed,
    /// Capability missing; the host was asked to open this settings tab.
    RedirectedToSettings(PreferencesTab),
}

/// Speech and image invocation for one conversation.
pub struct MediaActions {
    conversation_id: String,
    flags: Arc<BusyFlags>,
    capabilities: Arc<dyn CapabilityProbe>,
    speech_engine: Arc<dyn SpeechEngine>,
    image_engine: Arc<dyn ImageEngine>,
    navigator: Arc<dyn PreferencesNavigator>,
}

impl MediaActions {
    pub fn new(
        conversation_id: impl Into<String>,
        capabilities: Arc<dyn CapabilityProbe>,
        speech_engine: Arc<dyn SpeechEngine>,
        image_engine: Arc<dyn ImageEngine>,
        navigator: Arc<dyn PreferencesNavigator>,
    ) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            flags: Arc::new(BusyFlags::default()),
            capabilities,
            speech_engine,
            image_engine,
            navigator,
        }
    }

    pub fn flags(&self) -> Arc<BusyFlags> {
        Arc::clone(&self.flags)
    }

    pub fn is_speaking(&self) -> bool {
        self.flags.is_speaking()
    }

    pub fn is_imagining(&self) -> bool {
        self.flags.is_imagining()
    }

    /// Reads `text` aloud, or redirects to the voice settings when speech is
    /// not available.
    pub async fn speak(&self, text: &str) -> MediaOutcome {
        if !self.capabilities.capabilities().can_speak {
            return self.redirect("speech", PreferencesTab::Voice);
        }

        let _busy = BusyGuard::raise(&self.flags.speaking);
        match self.speech_engine.speak(text).await {
            Ok(()) => MediaOutcome::Completed,
            Err(e) => {
                tracing::warn!("[MediaActions] Speech failed: {}", e);
                MediaOutcome::Failed
            }
        }
    }

    /// Generates an image from `text`, or redirects to the draw settings when
    /// image generation is not available.
    pub async fn imagine(&self, text: &str) -> MediaOutcome {
        if !self.capabilities.capabilities().can_imagine {
            return self.redirect("image", PreferencesTab::Draw);
        }

        let _busy = BusyGuard::raise(&self.flags.imagining);
        match self.image_engine.imagine(&self.conversation_id, text).await {
            Ok(()) => MediaOutcome::Completed,
            Err(e) => {
                tracing::warn!(
                    "[MediaActions] Image generation failed for {}: {}",
                    self.conversation_id,
                    e
                );
                MediaOutcome::Failed
            }
        }
    }

    fn redirect(&self, capability: &str, tab: PreferencesTab) -> MediaOutcome {
        tracing::info!(
            "[MediaActions] {}, opening {} preferences",
            ThreadlineError::capability_unavailable(capability),
            tab
        );
        self.navigator.open_preferences_tab(tab);
        MediaOutcome::RedirectedToSettings(tab)
    }
}
