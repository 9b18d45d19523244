//! Draw pile and discard pile.
//!
//! Cards only ever move between these two piles and the players' hands, so
//! the total count stays fixed for the life of a session.

use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::rules::DeckSpec;
use crate::domain::{Card, Color, Rank};

/// Build a full, unshuffled deck from a composition spec.
pub fn build_deck(spec: &DeckSpec) -> Vec<Card> {
    let mut deck = Vec::with_capacity(spec.size());
    for color in Color::PLAYABLE {
        for _ in 0..spec.zeros_per_color {
            deck.push(Card::number(0, color));
        }
        for value in 1..=9 {
            for _ in 0..spec.numbers_per_color {
                deck.push(Card::number(value, color));
            }
        }
        for rank in [Rank::Skip, Rank::Reverse, Rank::DrawTwo] {
            for _ in 0..spec.actions_per_color {
                deck.push(Card::new(rank, color));
            }
        }
    }
    for _ in 0..spec.wilds {
        deck.push(Card::wild());
    }
    for _ in 0..spec.wild_draw_fours {
        deck.push(Card::wild_draw_four());
    }
    deck
}

/// Face-down pile players draw from. Draws come off the front.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawPile {
    cards: VecDeque<Card>,
}

impl DrawPile {
    pub fn new(cards: Vec<Card>) -> Self {
        Self {
            cards: cards.into(),
        }
    }

    pub fn shuffled<R: Rng + ?Sized>(mut cards: Vec<Card>, rng: &mut R) -> Self {
        cards.shuffle(rng);
        Self::new(cards)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop_front()
    }

    pub fn put_bottom(&mut self, card: Card) {
        self.cards.push_back(card);
    }

    /// Shuffle the discard pile (minus its top card) back into the draw pile.
    /// Returns how many cards came back.
    pub fn refill_from<R: Rng + ?Sized>(&mut self, discard: &mut DiscardPile, rng: &mut R) -> usize {
        let mut returned = discard.take_all_but_top();
        returned.shuffle(rng);
        let n = returned.len();
        self.cards.extend(returned);
        n
    }

    /// Draw up to `n` cards, refilling from the discard pile when the draw
    /// pile runs dry. Returns fewer than `n` only when both piles are spent.
    pub fn draw_with_refill<R: Rng + ?Sized>(
        &mut self,
        discard: &mut DiscardPile,
        n: usize,
        rng: &mut R,
    ) -> Vec<Card> {
        let mut drawn = Vec::with_capacity(n);
        while drawn.len() < n {
            if self.is_empty() && self.refill_from(discard, rng) == 0 {
                break;
            }
            match self.draw() {
                Some(card) => drawn.push(card),
                None => break,
            }
        }
        drawn
    }
}

/// Face-up pile; the last element is the top.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscardPile {
    cards: Vec<Card>,
}

impl DiscardPile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn top(&self) -> Option<Card> {
        self.cards.last().copied()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn take_all_but_top(&mut self) -> Vec<Card> {
        match self.cards.pop() {
            Some(top) => {
                let rest = std::mem::take(&mut self.cards);
                self.cards.push(top);
                rest
            }
            None => Vec::new(),
        }
    }

    /// Shuffle `cards` in beneath the top card (forfeited hands go here).
    pub fn bury<R: Rng + ?Sized>(&mut self, mut cards: Vec<Card>, rng: &mut R) {
        cards.shuffle(rng);
        let top = self.cards.pop();
        cards.append(&mut self.cards);
        cards.shuffle(rng);
        self.cards = cards;
        if let Some(top) = top {
            self.cards.push(top);
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    #[test]
    fn classic_deck_has_108_cards() {
        let deck = build_deck(&DeckSpec::classic());
        assert_eq!(deck.len(), 108);
        assert_eq!(deck.iter().filter(|c| c.is_wild()).count(), 8);
        assert_eq!(
            deck.iter()
                .filter(|c| **c == Card::number(0, Color::Red))
                .count(),
            1
        );
        assert_eq!(
            deck.iter()
                .filter(|c| **c == Card::new(Rank::Skip, Color::Blue))
                .count(),
            2
        );
    }

    #[test]
    fn shuffle_is_deterministic_per_seed() {
        let deck = build_deck(&DeckSpec::classic());
        let a = DrawPile::shuffled(deck.clone(), &mut rng());
        let b = DrawPile::shuffled(deck.clone(), &mut rng());
        let c = DrawPile::shuffled(deck, &mut ChaCha8Rng::seed_from_u64(8));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn draw_pops_from_front() {
        let mut pile = DrawPile::new(vec![Card::number(1, Color::Red), Card::number(2, Color::Red)]);
        assert_eq!(pile.draw(), Some(Card::number(1, Color::Red)));
        assert_eq!(pile.len(), 1);
    }

    #[test]
    fn refill_keeps_discard_top_in_place() {
        let mut discard = DiscardPile::new();
        for v in 1..=5 {
            discard.push(Card::number(v, Color::Green));
        }
        let mut pile = DrawPile::default();
        let drawn = pile.draw_with_refill(&mut discard, 3, &mut rng());

        assert_eq!(drawn.len(), 3);
        assert_eq!(discard.top(), Some(Card::number(5, Color::Green)));
        assert_eq!(discard.len(), 1);
        assert_eq!(pile.len(), 1);
        assert!(!drawn.contains(&Card::number(5, Color::Green)));
    }

    #[test]
    fn draw_stops_when_both_piles_are_spent() {
        let mut discard = DiscardPile::new();
        discard.push(Card::number(9, Color::Blue));
        discard.push(Card::number(8, Color::Blue));
        let mut pile = DrawPile::new(vec![Card::wild()]);

        let drawn = pile.draw_with_refill(&mut discard, 5, &mut rng());
        assert_eq!(drawn.len(), 2);
        assert!(pile.is_empty());
        assert_eq!(discard.len(), 1);
    }

    #[test]
    fn bury_preserves_top_and_count() {
        let mut discard = DiscardPile::new();
        discard.push(Card::number(1, Color::Yellow));
        discard.push(Card::number(2, Color::Yellow));
        discard.bury(
            vec![Card::wild(), Card::number(3, Color::Red)],
            &mut rng(),
        );
        assert_eq!(discard.len(), 4);
        assert_eq!(discard.top(), Some(Card::number(2, Color::Yellow)));
    }
}
