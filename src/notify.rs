//! Outbound notification events.
//!
//! The engine produces notification-worthy moments (invites, completed
//! games) and hands them by value to an external sink. Formatting and
//! delivery happen elsewhere; failures in the sink never affect game state.

use crate::identity::PlayerId;
use serde::{Deserialize, Serialize};

/// A notification-worthy event, handed to the sink fire-and-forget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameEvent {
    /// A player invited another to a session.
    Invite {
        /// Inviting player.
        from: PlayerId,
        /// Invited player.
        to: PlayerId,
        /// Game variant name.
        game: String,
        /// Session the invite points at.
        session_id: String,
    },
    /// A session finished with a result.
    Completed {
        /// Game variant name.
        game: String,
        /// Session that finished.
        session_id: String,
        /// Winner, absent on a draw.
        winner: Option<PlayerId>,
    },
}

/// Consumer of [`GameEvent`]s.
pub trait NotificationSink: Send + Sync {
    /// Accepts an event. Must not block the calling operation.
    fn notify(&self, event: GameEvent);
}

/// Sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&self, _event: GameEvent) {}
}

/// Sink that records events in memory, for tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: std::sync::Mutex<Vec<GameEvent>>,
}

impl RecordingSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything notified so far.
    pub fn events(&self) -> Vec<GameEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, event: GameEvent) {
        self.events.lock().unwrap().push(event);
    }
}
