//! Bounded log of recent table events, shown to every player.

use std::collections::VecDeque;

use serde::Serialize;

use crate::domain::state::PlayerId;
use crate::domain::{Card, Color};

pub const TURN_LOG_CAPACITY: usize = 10;

/// Something that happened at the table. Public information only: a draw
/// records how many cards were taken, never which.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TurnEvent {
    Started,
    Played {
        cards: Vec<Card>,
        #[serde(skip_serializing_if = "Option::is_none")]
        declared_color: Option<Color>,
    },
    Drew {
        count: u32,
    },
    Disconnected,
    Reconnected,
    Forfeited,
    Won,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnEntry {
    pub version: u64,
    pub player: PlayerId,
    #[serde(flatten)]
    pub event: TurnEvent,
}

#[derive(Debug, Clone, Default)]
pub struct TurnLog {
    entries: VecDeque<TurnEntry>,
}

impl TurnLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, version: u64, player: PlayerId, event: TurnEvent) {
        if self.entries.len() == TURN_LOG_CAPACITY {
            self.entries.pop_back();
        }
        self.entries.push_front(TurnEntry {
            version,
            player,
            event,
        });
    }

    /// Most recent first.
    pub fn recent(&self) -> Vec<TurnEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
