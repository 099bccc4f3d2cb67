//! Snapshot notifications for live views.

use crate::models::{BracketData, TournamentId};
use std::sync::Arc;
use tokio::sync::broadcast;

/// A bracket was saved; `bracket` is the full saved document.
#[derive(Clone, Debug)]
pub struct BracketEvent {
    pub tournament_id: TournamentId,
    pub bracket: Arc<BracketData>,
}

/// Fan-out of saved snapshots. Slow subscribers lag and skip to newer snapshots, which is
/// fine because every event carries the whole document.
#[derive(Clone, Debug)]
pub struct EventBus {
    sender: broadcast::Sender<BracketEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BracketEvent> {
        self.sender.subscribe()
    }

    /// Send to current subscribers. Returns how many received it.
    pub fn publish(&self, tournament_id: TournamentId, bracket: BracketData) -> usize {
        let event = BracketEvent {
            tournament_id,
            bracket: Arc::new(bracket),
        };
        self.sender.send(event).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
