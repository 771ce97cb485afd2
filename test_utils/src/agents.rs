//! Agent host that logs every spawn and removal.

use std::sync::{Arc, Mutex, PoisonError};

use aislewalk::surface::rect::{RectAgentHost, RectSurface};
use aislewalk::surface::{AgentHost, NavAgent};
use glam::Vec3;

/// One call made to a [`RecordingAgentHost`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    /// An agent was created at the position.
    Spawned(Vec3),
    /// An agent standing at the position was removed.
    Destroyed(Vec3),
}

/// Wraps a [`RectAgentHost`] and records its calls in a shared log.
#[derive(Debug, Clone)]
pub struct RecordingAgentHost {
    inner: RectAgentHost,
    events: Arc<Mutex<Vec<HostEvent>>>,
}

impl RecordingAgentHost {
    /// Creates a host spawning agents on `surface`.
    pub fn new(surface: RectSurface) -> Self {
        Self {
            inner: RectAgentHost::new(surface),
            events: Arc::default(),
        }
    }

    /// Handle to the event log that outlives moving the host.
    pub fn log(&self) -> EventLog {
        EventLog(Arc::clone(&self.events))
    }

    fn record(&self, event: HostEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl AgentHost for RecordingAgentHost {
    fn instantiate(&mut self, position: Vec3) -> Box<dyn NavAgent> {
        self.record(HostEvent::Spawned(position));
        self.inner.instantiate(position)
    }

    fn destroy(&mut self, agent: Box<dyn NavAgent>) {
        self.record(HostEvent::Destroyed(agent.position()));
        self.inner.destroy(agent);
    }
}

/// Read side of a [`RecordingAgentHost`] log.
#[derive(Debug, Clone)]
pub struct EventLog(Arc<Mutex<Vec<HostEvent>>>);

impl EventLog {
    /// Copy of the events recorded so far.
    pub fn events(&self) -> Vec<HostEvent> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Number of agents spawned so far.
    pub fn spawn_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, HostEvent::Spawned(_)))
            .count()
    }

    /// Number of agents spawned and not yet destroyed.
    pub fn live(&self) -> usize {
        let events = self.events();
        let spawned = events
            .iter()
            .filter(|event| matches!(event, HostEvent::Spawned(_)))
            .count();
        spawned.saturating_sub(events.len() - spawned)
    }
}
