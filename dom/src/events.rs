//! DOM Event System
//!
//! Listener registration and dispatch with bubbling through ancestors. Only
//! the event types the page scripts use are modelled.

use hashbrown::HashMap;

use crate::document::Document;
use crate::node::NodeId;

/// Event phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPhase {
    /// Event is not being dispatched.
    None = 0,
    /// Event has arrived at the event target.
    AtTarget = 2,
    /// Event is propagating back through target's ancestors.
    Bubbling = 3,
}

/// Event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Click,
    DOMContentLoaded,
}

impl EventType {
    /// Get event type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Click => "click",
            EventType::DOMContentLoaded => "DOMContentLoaded",
        }
    }

    /// Whether the event propagates to ancestors.
    pub fn bubbles(&self) -> bool {
        !matches!(self, EventType::DOMContentLoaded)
    }
}

/// A dispatched event.
#[derive(Debug, Clone)]
pub struct Event {
    /// Event type.
    pub event_type: EventType,
    /// Node the event was dispatched to.
    pub target: NodeId,
    /// Node whose listeners are running.
    pub current_target: NodeId,
    /// Current phase.
    pub phase: EventPhase,
    propagation_stopped: bool,
}

impl Event {
    fn new(event_type: EventType, target: NodeId) -> Self {
        Event {
            event_type,
            target,
            current_target: target,
            phase: EventPhase::None,
            propagation_stopped: false,
        }
    }

    /// Stop the event from reaching further ancestors.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Whether propagation was stopped.
    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// Event listener callback.
pub type Listener = Box<dyn Fn(&mut Document, &mut Event)>;

/// Event dispatcher holding listeners per (node, event type).
#[derive(Default)]
pub struct EventDispatcher {
    listeners: HashMap<(NodeId, EventType), Vec<Listener>>,
}

impl EventDispatcher {
    /// Create a new dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener.
    pub fn add_listener<F>(&mut self, target: NodeId, event_type: EventType, listener: F)
    where
        F: Fn(&mut Document, &mut Event) + 'static,
    {
        self.listeners
            .entry((target, event_type))
            .or_default()
            .push(Box::new(listener));
    }

    /// Remove all listeners for a target and type.
    pub fn remove_listeners(&mut self, target: NodeId, event_type: EventType) {
        self.listeners.remove(&(target, event_type));
    }

    /// Number of listeners for a target and type.
    pub fn listener_count(&self, target: NodeId, event_type: EventType) -> usize {
        self.listeners
            .get(&(target, event_type))
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Dispatch an event at `target`, then to its ancestors if it bubbles.
    ///
    /// The propagation path is fixed before any listener runs.
    pub fn dispatch(&self, doc: &mut Document, target: NodeId, event_type: EventType) -> Event {
        let mut path = vec![target];
        if event_type.bubbles() {
            let mut current = doc.parent(target);
            while let Some(id) = current {
                path.push(id);
                current = doc.parent(id);
            }
        }

        let mut event = Event::new(event_type, target);
        for (i, node) in path.into_iter().enumerate() {
            event.current_target = node;
            event.phase = if i == 0 {
                EventPhase::AtTarget
            } else {
                EventPhase::Bubbling
            };

            if let Some(listeners) = self.listeners.get(&(node, event_type)) {
                for listener in listeners {
                    listener(&mut *doc, &mut event);
                }
            }

            if event.propagation_stopped {
                break;
            }
        }

        event.phase = EventPhase::None;
        event
    }
}
