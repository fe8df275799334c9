//! Collaborator interfaces.
//!
//! The timeline engine only talks to the outside world through these traits:
//! conversation lookup and branching, history execution, speech and image
//! engines, capability and display flags, and the ephemeral status source.
//! Implementations live in the infrastructure crate or in the host.

mod conversation;
mod display;
mod ephemeral;
mod execution;
mod media;

pub use conversation::{BranchCreator, BranchRequest, ConversationLookup};
pub use display::DisplayPreferences;
pub use ephemeral::{Ephemeral, EphemeralSource, NoEphemerals};
pub use execution::{DiagramRequest, DiagramRequester, ExecutionEngine, ExecutionRequest};
pub use media::{
    Capabilities, CapabilityProbe, ImageEngine, PreferencesNavigator, PreferencesTab, SpeechEngine,
};
