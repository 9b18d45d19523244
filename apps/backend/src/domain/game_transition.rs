//! State transitions: applying accepted deltas and removing forfeited seats.
//!
//! Both operations move cards between piles and hands only. Callers check
//! [`check_invariants`] afterwards; any error here means the state is corrupt.

use rand::Rng;

use crate::domain::rules::StateDelta;
use crate::domain::state::{require_turn_in_range, Direction, GameState, PlayerId};
use crate::domain::Card;
use crate::errors::domain::DomainError;

/// Result of applying one delta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    /// Cards the acting player took; fewer than requested when both piles ran dry.
    pub drawn: Vec<Card>,
    /// Set when the play emptied the acting player's hand.
    pub winner: Option<PlayerId>,
}

/// Apply a delta produced by `rules::validate` against this same state.
pub fn apply_delta<R: Rng + ?Sized>(
    state: &mut GameState,
    delta: &StateDelta,
    rng: &mut R,
) -> Result<Applied, DomainError> {
    require_turn_in_range(state, "apply_delta")?;
    if delta.seat != state.turn || delta.next_turn >= state.seats.len() {
        return Err(DomainError::invariant(format!(
            "delta for seat {} -> {} does not fit turn {} of {} seats",
            delta.seat,
            delta.next_turn,
            state.turn,
            state.seats.len()
        )));
    }

    let GameState {
        seats,
        draw_pile,
        discard,
        ..
    } = state;
    let seat = &mut seats[delta.seat];

    for card in &delta.played {
        let pos = seat.hand.iter().position(|c| c == card).ok_or_else(|| {
            DomainError::invariant(format!("{card} missing from hand of player {}", seat.player))
        })?;
        seat.hand.remove(pos);
        discard.push(*card);
    }

    let drawn = if delta.draw_count > 0 {
        let drawn = draw_pile.draw_with_refill(discard, delta.draw_count as usize, rng);
        seat.hand.extend(drawn.iter().copied());
        drawn
    } else {
        Vec::new()
    };

    let winner = (delta.empties_hand && seat.hand.is_empty()).then_some(seat.player);
    if delta.empties_hand != seat.hand.is_empty() {
        return Err(DomainError::invariant(format!(
            "player {} hand has {} cards after a play marked empties_hand={}",
            seat.player,
            seat.hand.len(),
            delta.empties_hand
        )));
    }

    if !delta.played.is_empty() {
        state.declared_color = delta.declared_color;
    }
    state.direction = delta.direction;
    state.pending_draw = delta.pending_draw;
    state.turn = delta.next_turn;

    Ok(Applied { drawn, winner })
}

/// Remove `player`'s seat and bury their hand beneath the discard top.
///
/// When the removed seat held the turn it passes to the next player in the
/// current direction, and any pending penalty aimed at them lapses. Returns
/// the sole remaining player when only one is left.
pub fn forfeit_seat<R: Rng + ?Sized>(
    state: &mut GameState,
    player: PlayerId,
    rng: &mut R,
) -> Result<Option<PlayerId>, DomainError> {
    let index = state
        .seat_of(player)
        .ok_or_else(|| DomainError::invariant(format!("no seat for forfeiting player {player}")))?;
    let seat = state.seats.remove(index);
    state.discard.bury(seat.hand, rng);

    if state.seats.is_empty() {
        state.turn = 0;
        return Ok(None);
    }

    let remaining = state.seats.len();
    if index < state.turn {
        state.turn -= 1;
    } else if index == state.turn {
        state.pending_draw = 0;
        state.turn = match state.direction {
            Direction::Forward => index % remaining,
            Direction::Reverse => (index + remaining - 1) % remaining,
        };
    }

    Ok((remaining == 1).then(|| state.seats[0].player))
}

/// Turn index in range and total card count unchanged.
pub fn check_invariants(state: &GameState, expected_cards: usize) -> Result<(), DomainError> {
    require_turn_in_range(state, "check_invariants")?;
    let total = state.total_cards();
    if total != expected_cards {
        return Err(DomainError::invariant(format!(
            "card count drifted: expected {expected_cards}, found {total}"
        )));
    }
    Ok(())
}
