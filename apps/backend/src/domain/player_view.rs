//! Per-recipient view of a session: what one player is allowed to see.
//!
//! Other players' hands are reduced to a card count. Only the recipient's own
//! hand appears in `visible_hand`.

use serde::Serialize;

use crate::domain::rules::{playable_cards, RuleTable};
use crate::domain::state::{Direction, GameState, PlayerId, Presence, SessionStatus};
use crate::domain::turn_log::TurnEntry;
use crate::domain::{Card, Color};

/// Public information about one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatView {
    pub id: PlayerId,
    pub name: String,
    pub cards: usize,
    pub presence: Presence,
    pub is_host: bool,
}

/// The parts of a view that are the same for every recipient.
#[derive(Debug, Clone)]
pub struct TableView {
    pub version: u64,
    pub status: SessionStatus,
    pub players: Vec<SeatView>,
    pub recent: Vec<TurnEntry>,
    pub winner: Option<PlayerId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateView {
    pub version: u64,
    pub status: SessionStatus,
    pub you: PlayerId,
    pub visible_hand: Vec<Card>,
    /// Cards the recipient may play right now; empty off-turn.
    pub playable: Vec<Card>,
    pub discard_top: Option<Card>,
    pub declared_color: Option<Color>,
    pub turn_player: Option<PlayerId>,
    pub direction: Direction,
    pub pending_draw: u32,
    pub players: Vec<SeatView>,
    pub draw_pile: usize,
    pub recent: Vec<TurnEntry>,
    pub winner: Option<PlayerId>,
}

/// Build the view `recipient` should receive.
pub fn view_for(
    table: &TableView,
    game: Option<&GameState>,
    rules: &RuleTable,
    recipient: PlayerId,
) -> StateView {
    let mut visible_hand = game
        .and_then(|g| g.hand_of(recipient))
        .map(<[Card]>::to_vec)
        .unwrap_or_default();
    visible_hand.sort();

    let playable = match (table.status, game) {
        (SessionStatus::Active, Some(g)) => playable_cards(g, rules, recipient),
        _ => Vec::new(),
    };

    StateView {
        version: table.version,
        status: table.status,
        you: recipient,
        visible_hand,
        playable,
        discard_top: game.and_then(|g| g.discard.top()),
        declared_color: game.and_then(|g| g.declared_color),
        turn_player: match table.status {
            SessionStatus::Active => game.and_then(GameState::current_player),
            _ => None,
        },
        direction: game.map(|g| g.direction).unwrap_or(Direction::Forward),
        pending_draw: game.map(|g| g.pending_draw).unwrap_or(0),
        players: table.players.clone(),
        draw_pile: game.map(|g| g.draw_pile.len()).unwrap_or(0),
        recent: table.recent.clone(),
        winner: table.winner,
    }
}
