//! Service Worker Lifecycle Management
//!
//! Host-side adapter that turns install / activate / fetch into calls on a
//! [`LifecycleHandler`] and tracks the worker state the browser would.

use std::sync::Arc;

use super::events::{ActivateEvent, InstallEvent};
use super::fetch::{FetchEvent, FetchResult, Network, Request};
use super::{LifecycleHandler, ServiceWorkerError};

/// Service Worker states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServiceWorkerState {
    /// Initial state, script parsed
    #[default]
    Parsed,
    /// Installing (install event fired)
    Installing,
    /// Installed, waiting to activate
    Installed,
    /// Activating (activate event fired)
    Activating,
    /// Active and controlling pages
    Activated,
    /// Failed or replaced
    Redundant,
}

/// State change event data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChangeEvent {
    /// Old state
    pub old_state: ServiceWorkerState,
    /// New state
    pub new_state: ServiceWorkerState,
}

/// Check if a state transition is valid
pub fn is_valid_transition(from: ServiceWorkerState, to: ServiceWorkerState) -> bool {
    use ServiceWorkerState::*;

    matches!(
        (from, to),
        (Parsed, Installing)
            | (Installing, Installed)
            | (Installing, Redundant) // install failed
            | (Installed, Activating)
            | (Activating, Activated)
            | (Activating, Redundant) // activate failed
            | (Activated, Redundant) // replaced by a newer worker
    )
}

/// Drives one worker instance through its lifecycle.
pub struct WorkerHost {
    /// Event handlers
    handler: Arc<dyn LifecycleHandler>,
    /// Network used for requests the worker does not answer
    network: Arc<dyn Network>,
    /// Current state
    state: ServiceWorkerState,
    /// Every transition so far
    history: Vec<StateChangeEvent>,
}

impl WorkerHost {
    /// Create a host for a freshly parsed worker
    pub fn new(handler: Arc<dyn LifecycleHandler>, network: Arc<dyn Network>) -> Self {
        Self {
            handler,
            network,
            state: ServiceWorkerState::Parsed,
            history: Vec::new(),
        }
    }

    /// Get current state
    pub fn state(&self) -> ServiceWorkerState {
        self.state
    }

    /// Check if the worker is active
    pub fn is_active(&self) -> bool {
        self.state == ServiceWorkerState::Activated
    }

    /// Transitions recorded so far
    pub fn history(&self) -> &[StateChangeEvent] {
        &self.history
    }

    fn transition(&mut self, new_state: ServiceWorkerState) -> Result<(), ServiceWorkerError> {
        let old_state = self.state;
        if !is_valid_transition(old_state, new_state) {
            return Err(ServiceWorkerError::InvalidStateTransition {
                from: old_state,
                to: new_state,
            });
        }

        log::debug!("[FoodFest SW] state {:?} -> {:?}", old_state, new_state);
        self.state = new_state;
        self.history.push(StateChangeEvent {
            old_state,
            new_state,
        });
        Ok(())
    }

    /// Fire the install event and wait for the handler to settle.
    ///
    /// A failed install leaves the worker redundant; the next registration
    /// attempt starts over with a new host.
    pub async fn install(&mut self) -> Result<(), ServiceWorkerError> {
        self.transition(ServiceWorkerState::Installing)?;

        let mut event = InstallEvent::new();
        match self.handler.on_install(&mut event).await {
            Ok(()) => self.transition(ServiceWorkerState::Installed),
            Err(err) => {
                log::warn!("[FoodFest SW] install failed: {}", err);
                self.transition(ServiceWorkerState::Redundant)?;
                Err(err)
            }
        }
    }

    /// Fire the activate event and wait for the handler to settle.
    pub async fn activate(&mut self) -> Result<(), ServiceWorkerError> {
        self.transition(ServiceWorkerState::Activating)?;

        let mut event = ActivateEvent::new();
        match self.handler.on_activate(&mut event).await {
            Ok(()) => self.transition(ServiceWorkerState::Activated),
            Err(err) => {
                log::warn!("[FoodFest SW] activate failed: {}", err);
                self.transition(ServiceWorkerState::Redundant)?;
                Err(err)
            }
        }
    }

    /// Route a page request.
    ///
    /// Requests reach the worker once activation has started; before that, or
    /// when the handler does not respond, they go straight to the network.
    pub async fn fetch(&self, request: Request) -> FetchResult {
        let controlled = matches!(
            self.state,
            ServiceWorkerState::Activating | ServiceWorkerState::Activated
        );
        if !controlled {
            return Ok(self.network.fetch(&request).await?);
        }

        let mut event = FetchEvent::new(request);
        self.handler.on_fetch(&mut event).await;
        match event.take_response() {
            Some(result) => result,
            None => Ok(self.network.fetch(event.request()).await?),
        }
    }
}
