//! Rule engine: pure move validation against a configurable rule table.
//!
//! `validate` never mutates. It returns a [`StateDelta`] describing what an
//! accepted move changes; the session applies the delta.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::state::{next_seat, seat_offset, Direction, GameState, PlayerId};
use crate::domain::{Card, Color, Rank, RankKind};
use crate::errors::domain::{DomainError, ValidationKind};
use crate::errors::Rejection;

/// What a card does to the turn loop when played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Effect {
    None,
    Skip,
    Reverse,
    Draw { count: u32 },
}

/// Deck composition. Numbers 1..=9, skip, reverse and draw-two are per color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeckSpec {
    pub zeros_per_color: u8,
    pub numbers_per_color: u8,
    pub actions_per_color: u8,
    pub wilds: u8,
    pub wild_draw_fours: u8,
}

impl DeckSpec {
    pub fn classic() -> Self {
        Self {
            zeros_per_color: 1,
            numbers_per_color: 2,
            actions_per_color: 2,
            wilds: 4,
            wild_draw_fours: 4,
        }
    }

    pub fn size(&self) -> usize {
        let per_color = self.zeros_per_color as usize
            + 9 * self.numbers_per_color as usize
            + 3 * self.actions_per_color as usize;
        4 * per_color + self.wilds as usize + self.wild_draw_fours as usize
    }

    pub fn non_wild_count(&self) -> usize {
        self.size() - self.wilds as usize - self.wild_draw_fours as usize
    }
}

impl Default for DeckSpec {
    fn default() -> Self {
        Self::classic()
    }
}

/// Game options and the per-rank effect table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuleTable {
    pub min_players: usize,
    pub max_players: usize,
    pub hand_size: usize,
    /// A pending draw penalty may be passed on by playing another draw card.
    pub stacking: bool,
    /// Several cards of one rank may be played in a single move.
    pub multi_play: bool,
    /// Multi-play also allowed for wilds and cards with an effect.
    pub multi_play_effects: bool,
    /// With two players a reverse acts as a skip.
    pub reverse_skips_heads_up: bool,
    pub effects: BTreeMap<RankKind, Effect>,
    pub deck: DeckSpec,
}

impl RuleTable {
    pub fn classic() -> Self {
        let effects = BTreeMap::from([
            (RankKind::Number, Effect::None),
            (RankKind::Skip, Effect::Skip),
            (RankKind::Reverse, Effect::Reverse),
            (RankKind::DrawTwo, Effect::Draw { count: 2 }),
            (RankKind::Wild, Effect::None),
            (RankKind::WildDrawFour, Effect::Draw { count: 4 }),
        ]);
        Self {
            min_players: 2,
            max_players: 10,
            hand_size: 7,
            stacking: true,
            multi_play: true,
            multi_play_effects: false,
            reverse_skips_heads_up: true,
            effects,
            deck: DeckSpec::classic(),
        }
    }

    pub fn effect_of(&self, rank: Rank) -> Effect {
        self.effects
            .get(&rank.kind())
            .copied()
            .unwrap_or(Effect::None)
    }

    /// Reject tables that cannot run a game.
    pub fn validate(&self) -> Result<(), DomainError> {
        let invalid =
            |detail: String| DomainError::validation(ValidationKind::InvalidRuleTable, detail);

        if self.min_players < 2 {
            return Err(invalid(format!(
                "min_players must be at least 2, got {}",
                self.min_players
            )));
        }
        if self.max_players < self.min_players {
            return Err(invalid(format!(
                "max_players ({}) is below min_players ({})",
                self.max_players, self.min_players
            )));
        }
        if self.hand_size == 0 {
            return Err(invalid("hand_size must be at least 1".to_string()));
        }
        let dealt = self.max_players * self.hand_size;
        if self.deck.size() <= dealt {
            return Err(invalid(format!(
                "deck of {} cards cannot deal {} hands of {} and flip a starter",
                self.deck.size(),
                self.max_players,
                self.hand_size
            )));
        }
        if self.deck.non_wild_count() == 0 {
            return Err(invalid("deck needs at least one colored card".to_string()));
        }
        Ok(())
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::classic()
    }
}

/// A player's intent for their turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Play one card, or several of one rank when multi-play is on.
    Play {
        cards: Vec<Card>,
        declared_color: Option<Color>,
    },
    /// Take the pending penalty (or one card) and pass the turn.
    Draw,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    pub player: PlayerId,
    pub action: Action,
}

/// Effect triggered by an accepted play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggeredEffect {
    Skip { skipped: usize },
    Reverse,
    ForcedDraw { total: u32 },
}

/// Minimal state change produced by one accepted move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateDelta {
    pub player: PlayerId,
    /// Seat index of the acting player.
    pub seat: usize,
    /// Cards leaving the hand for the discard pile, in play order.
    pub played: Vec<Card>,
    /// Cards the acting player takes from the draw pile.
    pub draw_count: u32,
    pub declared_color: Option<Color>,
    pub direction: Direction,
    pub next_turn: usize,
    pub pending_draw: u32,
    pub effect: Option<TriggeredEffect>,
    pub empties_hand: bool,
}

/// Whether `card` may go on `top`: wild, the color to match (see
/// [`GameState::effective_color`]), or same rank as a colored top.
pub fn is_compatible(card: Card, top: Option<Card>, color: Option<Color>) -> bool {
    let Some(top) = top else {
        return true;
    };
    if card.is_wild() {
        return true;
    }
    color == Some(card.color) || (!top.is_wild() && card.rank == top.rank)
}

/// Multiset containment: every card in `cards` is in `hand`, counting copies.
pub fn hand_contains_all(hand: &[Card], cards: &[Card]) -> bool {
    let mut remaining = hand.to_vec();
    cards.iter().all(|card| match remaining.iter().position(|c| c == card) {
        Some(pos) => {
            remaining.swap_remove(pos);
            true
        }
        None => false,
    })
}

/// Validate a move against the current state.
///
/// Checks run in a fixed order: turn, hand membership, discard compatibility,
/// then pending-penalty compliance.
pub fn validate(state: &GameState, rules: &RuleTable, mv: &Move) -> Result<StateDelta, Rejection> {
    let seat = state.turn;
    if state.current_player() != Some(mv.player) {
        return Err(Rejection::NotYourTurn);
    }

    match &mv.action {
        Action::Draw => Ok(draw_delta(state, seat, mv.player)),
        Action::Play {
            cards,
            declared_color,
        } => play_delta(state, rules, seat, mv.player, cards, *declared_color),
    }
}

fn draw_delta(state: &GameState, seat: usize, player: PlayerId) -> StateDelta {
    let draw_count = state.pending_draw.max(1);
    StateDelta {
        player,
        seat,
        played: Vec::new(),
        draw_count,
        declared_color: state.declared_color,
        direction: state.direction,
        next_turn: next_seat(seat, state.seats.len(), state.direction),
        pending_draw: 0,
        effect: None,
        empties_hand: false,
    }
}

fn play_delta(
    state: &GameState,
    rules: &RuleTable,
    seat: usize,
    player: PlayerId,
    cards: &[Card],
    declared_color: Option<Color>,
) -> Result<StateDelta, Rejection> {
    let Some((&first, rest)) = cards.split_first() else {
        return Err(Rejection::EmptyPlay);
    };

    let hand = &state.seats[seat].hand;
    if !hand_contains_all(hand, cards) {
        return Err(Rejection::CardNotInHand);
    }

    let effect = rules.effect_of(first.rank);
    if !rest.is_empty() {
        if !rules.multi_play || rest.iter().any(|c| c.rank != first.rank) {
            return Err(Rejection::IllegalCombination);
        }
        let has_effect = first.is_wild() || effect != Effect::None;
        if has_effect && !rules.multi_play_effects {
            return Err(Rejection::IllegalCombination);
        }
    }

    if !is_compatible(first, state.discard.top(), state.effective_color()) {
        return Err(Rejection::IllegalPlay);
    }

    let declared = if first.is_wild() {
        match declared_color {
            Some(color) if !color.is_wild() => Some(color),
            _ => return Err(Rejection::DeclaredColorRequired),
        }
    } else {
        None
    };

    if state.pending_draw > 0 {
        let stacks = rules.stacking && matches!(effect, Effect::Draw { .. });
        if !stacks {
            return Err(Rejection::MustRespondToPenalty);
        }
    }

    let count = cards.len();
    let seat_count = state.seats.len();
    let mut direction = state.direction;
    let mut pending_draw = state.pending_draw;

    let (steps, triggered) = match effect {
        Effect::None => (1, None),
        Effect::Skip => (1 + count, Some(TriggeredEffect::Skip { skipped: count })),
        Effect::Reverse if seat_count == 2 && rules.reverse_skips_heads_up => {
            (1 + count, Some(TriggeredEffect::Skip { skipped: count }))
        }
        Effect::Reverse => {
            if count % 2 == 1 {
                direction = direction.flipped();
            }
            (1, Some(TriggeredEffect::Reverse))
        }
        Effect::Draw { count: per_card } => {
            pending_draw += per_card * count as u32;
            (1, Some(TriggeredEffect::ForcedDraw { total: pending_draw }))
        }
    };

    Ok(StateDelta {
        player,
        seat,
        played: cards.to_vec(),
        draw_count: 0,
        declared_color: declared,
        direction,
        next_turn: seat_offset(seat, seat_count, direction, steps),
        pending_draw,
        effect: triggered,
        empties_hand: hand.len() == count,
    })
}

/// Cards `player` could legally play on their own right now, one at a time.
/// Empty when it is not their turn.
pub fn playable_cards(state: &GameState, rules: &RuleTable, player: PlayerId) -> Vec<Card> {
    let Some(hand) = state.hand_of(player) else {
        return Vec::new();
    };
    let mut playable: Vec<Card> = hand
        .iter()
        .copied()
        .filter(|&card| {
            let mv = Move {
                player,
                action: Action::Play {
                    cards: vec![card],
                    declared_color: card.is_wild().then_some(Color::Red),
                },
            };
            validate(state, rules, &mv).is_ok()
        })
        .collect();
    playable.sort();
    playable.dedup();
    playable
}
