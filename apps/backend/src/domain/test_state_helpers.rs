//! Test-only game state helpers for domain unit tests.

use crate::domain::deck::{DiscardPile, DrawPile};
use crate::domain::rules::{Action, Move};
use crate::domain::state::{Direction, GameState, PlayerId, Seat};
use crate::domain::{Card, Color};

/// Parse a card literal; panics on typos in test fixtures.
pub fn p(s: &str) -> Card {
    s.parse()
        .unwrap_or_else(|e| panic!("bad card literal {s:?}: {e}"))
}

/// Build an Active-phase state. Players get ids 1..=n in seat order, seat 0
/// holds the turn, `top` is the only discard, and the draw pile holds ten
/// green number cards.
pub fn game_with(hands: Vec<Vec<Card>>, top: Card) -> GameState {
    let seats = hands
        .into_iter()
        .enumerate()
        .map(|(i, hand)| Seat {
            player: i as PlayerId + 1,
            hand,
        })
        .collect();
    let mut discard = DiscardPile::new();
    discard.push(top);
    GameState {
        seats,
        turn: 0,
        direction: Direction::Forward,
        draw_pile: DrawPile::new((0..10).map(|v| Card::number(v, Color::Green)).collect()),
        discard,
        declared_color: None,
        pending_draw: 0,
    }
}

/// A play move from card literals, with no declared color.
pub fn play(player: PlayerId, cards: &[&str]) -> Move {
    Move {
        player,
        action: Action::Play {
            cards: cards.iter().map(|s| p(s)).collect(),
            declared_color: None,
        },
    }
}
