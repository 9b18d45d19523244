use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::deck::{DiscardPile, DrawPile};
use crate::domain::{Card, Color};
use crate::errors::domain::DomainError;

/// Player identity within a room; assigned in join order starting at 1.
pub type PlayerId = u32;

/// Room identifier (a short join code).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Session lifecycle. Only ever moves forward: Waiting → Active → Finished.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Accepting joins; game not dealt yet.
    Waiting,
    /// Turn loop running.
    Active,
    /// Terminal.
    Finished,
}

/// Per-player connection sub-state during a game.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    Active,
    /// Disconnected; hand and turn slot held until the reconnection window ends.
    Inactive,
    /// Reconnection window expired; out of the game.
    Forfeited,
}

/// Play direction around the table.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Reverse,
}

impl Direction {
    pub fn flipped(self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }

    fn sign(self) -> i64 {
        match self {
            Direction::Forward => 1,
            Direction::Reverse => -1,
        }
    }
}

/// A player's place in the turn order and the hand they hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    pub player: PlayerId,
    pub hand: Vec<Card>,
}

/// In-game state: everything the rule engine reads.
///
/// `seats` holds only players still in the game; forfeited players are
/// removed and the turn index is adjusted.
#[derive(Debug, Clone)]
pub struct GameState {
    pub seats: Vec<Seat>,
    /// Index into `seats` of the player holding the turn.
    pub turn: usize,
    pub direction: Direction,
    pub draw_pile: DrawPile,
    pub discard: DiscardPile,
    /// Color chosen by the last wild, if the discard top is wild.
    pub declared_color: Option<Color>,
    /// Cards the current player must draw unless they stack.
    pub pending_draw: u32,
}

impl GameState {
    pub fn current_player(&self) -> Option<PlayerId> {
        self.seats.get(self.turn).map(|s| s.player)
    }

    pub fn seat_of(&self, player: PlayerId) -> Option<usize> {
        self.seats.iter().position(|s| s.player == player)
    }

    pub fn hand_of(&self, player: PlayerId) -> Option<&[Card]> {
        self.seats
            .iter()
            .find(|s| s.player == player)
            .map(|s| s.hand.as_slice())
    }

    /// Color a card must match on the discard top: the declared color after a
    /// wild, otherwise the top card's own color.
    pub fn effective_color(&self) -> Option<Color> {
        self.declared_color
            .or_else(|| self.discard.top().map(|c| c.color))
    }

    /// Cards across all hands, the draw pile, and the discard pile.
    pub fn total_cards(&self) -> usize {
        self.seats.iter().map(|s| s.hand.len()).sum::<usize>()
            + self.draw_pile.len()
            + self.discard.len()
    }
}

/// Seat index `steps` places away from `from` in `direction`, wrapping.
///
/// ```
/// use threeup::domain::state::{seat_offset, Direction};
///
/// assert_eq!(seat_offset(0, 4, Direction::Forward, 1), 1);
/// assert_eq!(seat_offset(0, 4, Direction::Reverse, 1), 3);
/// assert_eq!(seat_offset(3, 4, Direction::Forward, 2), 1);
/// ```
#[inline]
pub fn seat_offset(from: usize, seat_count: usize, direction: Direction, steps: usize) -> usize {
    debug_assert!(seat_count > 0, "seat_offset needs at least one seat");
    let n = seat_count as i64;
    let delta = direction.sign() * steps as i64;
    (from as i64 + delta).rem_euclid(n) as usize
}

/// The next seat in `direction`.
#[inline]
pub fn next_seat(from: usize, seat_count: usize, direction: Direction) -> usize {
    seat_offset(from, seat_count, direction, 1)
}

pub fn require_turn_in_range(state: &GameState, ctx: &'static str) -> Result<(), DomainError> {
    if state.seats.is_empty() || state.turn >= state.seats.len() {
        return Err(DomainError::invariant(format!(
            "turn index {} out of range for {} seats ({ctx})",
            state.turn,
            state.seats.len()
        )));
    }
    Ok(())
}
