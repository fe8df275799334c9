//! Derived views and session state over a message timeline.
//!
//! Everything here is a pure function of the message list (or, for the
//! selection controller, of explicit host gestures). Nothing is cached between
//! store changes.

mod diff;
mod selection;
mod view;

pub use diff::{DiffPair, DiffPolicy, find_diff_target};
pub use selection::{SelectionController, SelectionMode};
pub use view::{ViewFilter, VisibleMessage};
