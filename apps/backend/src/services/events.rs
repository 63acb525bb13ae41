//! Event delivery at the engine/transport boundary.
//!
//! The engine never talks to a socket; it hands finished events to an
//! `EventSink` and the transport decides how to fan them out.

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use crate::domain::player::PlayerId;
use crate::protocol::Event;

/// Who an event is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    /// One player only; used for per-viewer snapshots and caller errors.
    Player(PlayerId),
    /// Every player in the session.
    All,
}

#[async_trait]
pub trait EventSink: Send + Sync + 'static {
    async fn deliver(&self, code: &str, to: Recipient, event: Event);
}

/// Default sink when no transport is attached: events go to the log.
#[derive(Debug, Default)]
pub struct TracingSink;

#[async_trait]
impl EventSink for TracingSink {
    async fn deliver(&self, code: &str, to: Recipient, event: Event) {
        debug!(code, ?to, ?event, "event");
    }
}

/// Sink that records everything it sees; used by tests and the simulator.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<(String, Recipient, Event)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain all recorded events.
    pub fn take(&self) -> Vec<(String, Recipient, Event)> {
        std::mem::take(&mut *self.events.lock())
    }

    /// Events a given player would have received: their personal events
    /// plus broadcasts. Does not drain.
    pub fn visible_to(&self, player: PlayerId) -> Vec<Event> {
        self.events
            .lock()
            .iter()
            .filter(|(_, to, _)| match to {
                Recipient::All => true,
                Recipient::Player(p) => *p == player,
            })
            .map(|(_, _, e)| e.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

#[async_trait]
impl EventSink for RecordingSink {
    async fn deliver(&self, code: &str, to: Recipient, event: Event) {
        self.events.lock().push((code.to_string(), to, event));
    }
}
