//! Service Worker Events
//!
//! Lifecycle event payloads delivered by the host.

/// Event type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    /// Install event
    Install,
    /// Activate event
    Activate,
}

impl EventType {
    /// Name the host uses for this event
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Install => "install",
            EventType::Activate => "activate",
        }
    }
}

/// Extendable event trait
///
/// `wait_until` tells the host that the phase is not finished until the
/// handler's pending work settles.
pub trait ExtendableEvent {
    /// Get event type
    fn event_type(&self) -> EventType;

    /// Extend the event lifetime until the handler completes
    fn wait_until(&mut self);

    /// Check if wait_until was called
    fn has_wait_until(&self) -> bool;
}

/// Install event data
#[derive(Debug, Clone, Default)]
pub struct InstallEvent {
    wait_until: bool,
}

impl InstallEvent {
    /// Create new install event
    pub fn new() -> Self {
        Self::default()
    }
}

impl ExtendableEvent for InstallEvent {
    fn event_type(&self) -> EventType {
        EventType::Install
    }

    fn wait_until(&mut self) {
        self.wait_until = true;
    }

    fn has_wait_until(&self) -> bool {
        self.wait_until
    }
}

/// Activate event data
#[derive(Debug, Clone, Default)]
pub struct ActivateEvent {
    wait_until: bool,
}

impl ActivateEvent {
    /// Create new activate event
    pub fn new() -> Self {
        Self::default()
    }
}

impl ExtendableEvent for ActivateEvent {
    fn event_type(&self) -> EventType {
        EventType::Activate
    }

    fn wait_until(&mut self) {
        self.wait_until = true;
    }

    fn has_wait_until(&self) -> bool {
        self.wait_until
    }
}
