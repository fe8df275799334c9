//! Per-conversation façade used by a host UI.
//!
//! `TimelineSession` wires the message store to its dispatcher, selection
//! controller, media actions, ephemeral overlay and view publisher. Hosts feed
//! it gestures and read back a `TimelineView`.

use crate::dispatcher::TimelineDispatcher;
use crate::media::MediaActions;
use crate::overlay::EphemeralOverlay;
use crate::view::{TimelineView, render_timeline};
use crate::view_publisher::{DerivedView, ViewPublisher};
use std::sync::Arc;
use threadline_core::config::TimelineConfig;
use threadline_core::conversation::{MessageStore, SharedMessageStore, TimelineObserver};
use threadline_core::error::Result;
use threadline_core::message::TokenCounter;
use threadline_core::port::{
    BranchCreator, CapabilityProbe, ConversationLookup, DiagramRequester, DisplayPreferences,
    EphemeralSource, ExecutionEngine, ImageEngine, PreferencesNavigator, SpeechEngine,
};
use threadline_core::timeline::{SelectionController, SelectionMode, ViewFilter};
use tokio::sync::watch;

/// Collaborators a session talks to.
#[derive(Clone)]
pub struct SessionCollaborators {
    pub execution_engine: Arc<dyn ExecutionEngine>,
    pub branch_creator: Arc<dyn BranchCreator>,
    pub speech_engine: Arc<dyn SpeechEngine>,
    pub image_engine: Arc<dyn ImageEngine>,
    pub capabilities: Arc<dyn CapabilityProbe>,
    pub preferences_navigator: Arc<dyn PreferencesNavigator>,
    pub ephemeral_source: Arc<dyn EphemeralSource>,
    pub display_preferences: Arc<dyn DisplayPreferences>,
    pub token_counter: Arc<dyn TokenCounter>,
    pub diagram_requester: Option<Arc<dyn DiagramRequester>>,
}

/// The timeline engine bound to one conversation.
pub struct TimelineSession {
    conversation_id: String,
    config: TimelineConfig,
    store: SharedMessageStore,
    selection: SelectionController,
    dispatcher: TimelineDispatcher,
    media: MediaActions,
    overlay: EphemeralOverlay,
    display_preferences: Arc<dyn DisplayPreferences>,
    publisher: Arc<ViewPublisher>,
}

impl TimelineSession {
    /// Opens a session for `conversation_id`, starting empty if the lookup
    /// does not know the conversation.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails or hands back duplicate ids.
    pub async fn open(
        conversation_id: &str,
        lookup: &dyn ConversationLookup,
        collaborators: SessionCollaborators,
        config: TimelineConfig,
    ) -> Result<Self> {
        let mut store = match lookup.find_by_id(conversation_id).await? {
            Some(conversation) => {
                MessageStore::from_conversation(conversation, collaborators.token_counter.clone())?
            }
            None => {
                tracing::debug!(
                    "[TimelineSession] Conversation {} not found, starting empty",
                    conversation_id
                );
                MessageStore::new(conversation_id, collaborators.token_counter.clone())
            }
        };

        let (publisher, _) =
            ViewPublisher::new(collaborators.display_preferences.clone(), config.diff);
        publisher.republish(store.messages());
        store.subscribe(publisher.clone());

        tracing::info!(
            "[TimelineSession] Opened {} with {} messages ({} tokens)",
            conversation_id,
            store.len(),
            store.token_count()
        );

        let conversation_id = store.conversation_id().to_string();
        Ok(Self::from_store(
            conversation_id,
            store.into_shared(),
            collaborators,
            config,
            publisher,
        ))
    }

    fn from_store(
        conversation_id: String,
        store: SharedMessageStore,
        collaborators: SessionCollaborators,
        config: TimelineConfig,
        publisher: Arc<ViewPublisher>,
    ) -> Self {
        let mut dispatcher = TimelineDispatcher::new(
            store.clone(),
            collaborators.execution_engine,
            collaborators.branch_creator,
        );
        if let Some(requester) = collaborators.diagram_requester {
            dispatcher = dispatcher.with_diagram_requester(requester);
        }

        let media = MediaActions::new(
            conversation_id.clone(),
            collaborators.capabilities,
            collaborators.speech_engine,
            collaborators.image_engine,
            collaborators.preferences_navigator,
        );
        let overlay = EphemeralOverlay::new(conversation_id.clone(), collaborators.ephemeral_source);

        Self {
            conversation_id,
            config,
            store,
            selection: SelectionController::new(),
            dispatcher,
            media,
            overlay,
            display_preferences: collaborators.display_preferences,
            publisher,
        }
    }

    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    /// The store, for collaborators that append results asynchronously.
    pub fn store(&self) -> SharedMessageStore {
        Arc::clone(&self.store)
    }

    pub fn dispatcher(&self) -> &TimelineDispatcher {
        &self.dispatcher
    }

    pub fn media(&self) -> &MediaActions {
        &self.media
    }

    /// Receiver that sees a new `DerivedView` after every store mutation.
    pub fn view_updates(&self) -> watch::Receiver<DerivedView> {
        self.publisher.subscribe()
    }

    /// Republishes the derived view from the current timeline. Hosts call
    /// this after changing a display preference, which is not a store change.
    pub async fn republish(&self) {
        let store = self.store.read().await;
        self.publisher.republish(store.messages());
    }

    pub async fn subscribe(&self, observer: Arc<dyn TimelineObserver>) {
        self.store.write().await.subscribe(observer);
    }

    pub async fn token_count(&self) -> usize {
        self.store.read().await.token_count()
    }

    fn view_filter(&self) -> ViewFilter {
        ViewFilter::new(self.display_preferences.show_system_messages())
    }

    /// Renders the current timeline, selection header and ephemerals.
    pub async fn render(&self) -> TimelineView {
        let store = self.store.read().await;
        render_timeline(
            &store,
            self.view_filter(),
            &self.config,
            &self.selection,
            self.overlay.current(),
            &self.media.flags(),
        )
    }

    // ========================================================================
    // Selection mode
    // ========================================================================

    pub fn selection_mode(&self) -> SelectionMode {
        self.selection.mode()
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    /// Host toggle for selection mode; leaving it discards the selection.
    pub fn set_selection_mode(&mut self, active: bool) {
        tracing::debug!(
            "[TimelineSession] Selection mode {} for {}",
            if active { "entered" } else { "exited" },
            self.conversation_id
        );
        self.selection.set_active(active);
    }

    /// Escape shortcut: leaves selection mode if it is active.
    ///
    /// Returns `true` when the key was consumed.
    pub fn on_escape(&mut self) -> bool {
        if self.selection.is_active() {
            self.set_selection_mode(false);
            true
        } else {
            false
        }
    }

    /// Selects every currently displayed message, or clears the selection.
    pub async fn select_all(&mut self, on: bool) {
        let filter = self.view_filter();
        let store = self.store.read().await;
        self.selection
            .select_all(on, filter.visible_ids(store.messages()));
    }

    pub fn toggle_selected(&mut self, message_id: &str, on: bool) {
        self.selection.toggle(message_id, on);
    }

    /// Deletes the selected messages and leaves selection mode.
    pub async fn delete_selected(&mut self) -> usize {
        let mut store = self.store.write().await;
        self.selection.delete_selected(&mut store)
    }
}
