use std::sync::atomic::{AtomicBool, Ordering};
use threadline_core::port::DisplayPreferences;

/// Host-adjustable display preference.
///
/// The view is recomputed from the current value on every read, so toggling
/// takes effect on the next render without touching the store.
#[derive(Debug, Default)]
pub struct DisplaySettings {
    show_system_messages: AtomicBool,
}

impl DisplaySettings {
    pub fn new(show_system_messages: bool) -> Self {
        Self {
            show_system_messages: AtomicBool::new(show_system_messages),
        }
    }

    pub fn set_show_system_messages(&self, show: bool) {
        self.show_system_messages.store(show, Ordering::SeqCst);
    }
}

impl DisplayPreferences for DisplaySettings {
    fn show_system_messages(&self) -> bool {
        self.show_system_messages.load(Ordering::SeqCst)
    }
}
