//! Opening deal: seat order, hands, and the starter card.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::deck::{build_deck, DiscardPile, DrawPile};
use crate::domain::rules::RuleTable;
use crate::domain::state::{Direction, GameState, PlayerId, Seat};
use crate::errors::domain::{DomainError, ValidationKind};

/// Shuffle the seat order, deal `hand_size` cards round-robin, and flip a
/// starter. Wild cards flipped as the starter go to the bottom of the draw
/// pile so the game always opens on a color.
pub fn deal_game<R: Rng + ?Sized>(
    players: &[PlayerId],
    rules: &RuleTable,
    rng: &mut R,
) -> Result<GameState, DomainError> {
    if players.len() < rules.min_players || players.len() > rules.max_players {
        return Err(DomainError::validation_other(format!(
            "cannot deal for {} players (allowed {}..={})",
            players.len(),
            rules.min_players,
            rules.max_players
        )));
    }
    let needed = players.len() * rules.hand_size + 1;
    if rules.deck.size() < needed {
        return Err(DomainError::validation(
            ValidationKind::InvalidRuleTable,
            format!("deck of {} cannot cover {needed} cards", rules.deck.size()),
        ));
    }

    let mut order = players.to_vec();
    order.shuffle(rng);

    let mut draw_pile = DrawPile::shuffled(build_deck(&rules.deck), rng);
    let mut seats: Vec<Seat> = order
        .into_iter()
        .map(|player| Seat {
            player,
            hand: Vec::with_capacity(rules.hand_size),
        })
        .collect();
    for _ in 0..rules.hand_size {
        for seat in seats.iter_mut() {
            let card = draw_pile
                .draw()
                .ok_or_else(|| DomainError::invariant("draw pile ran out while dealing"))?;
            seat.hand.push(card);
        }
    }

    let mut discard = DiscardPile::new();
    let mut flips = 0usize;
    loop {
        let card = draw_pile
            .draw()
            .ok_or_else(|| DomainError::invariant("no starter card left to flip"))?;
        if !card.is_wild() {
            discard.push(card);
            break;
        }
        draw_pile.put_bottom(card);
        flips += 1;
        if flips > draw_pile.len() {
            return Err(DomainError::invariant("draw pile holds only wild cards"));
        }
    }

    Ok(GameState {
        seats,
        turn: 0,
        direction: Direction::Forward,
        draw_pile,
        discard,
        declared_color: None,
        pending_draw: 0,
    })
}
