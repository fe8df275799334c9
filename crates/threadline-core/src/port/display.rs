/// Inbound display preference, consulted on every view recompute.
pub trait DisplayPreferences: Send + Sync {
    fn show_system_messages(&self) -> bool;
}

