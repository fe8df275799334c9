//! Application layer for Threadline.
//!
//! This crate provides the use cases a host UI drives: timeline actions,
//! selection-mode bulk deletes, speech and image invocation with busy flags,
//! and the rendered view combining timeline, diff target and ephemerals.

pub mod dispatcher;
pub mod display;
pub mod media;
pub mod overlay;
pub mod session;
pub mod view;
pub mod view_publisher;

#[cfg(test)]
mod test_support;

pub use dispatcher::{ActionOutcome, TimelineDispatcher};
pub use display::DisplaySettings;
pub use media::{BusyFlags, MediaActions, MediaOutcome};
pub use overlay::EphemeralOverlay;
pub use session::{SessionCollaborators, TimelineSession};
pub use view::{SelectionSummary, TimelineEntry, TimelineView, render_timeline};
pub use view_publisher::{DerivedView, ViewPublisher};
