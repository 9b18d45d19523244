// Proptest generators for domain types.
// Games are generated by construction (seeded deal) rather than filtered.

use proptest::prelude::*;

use crate::domain::dealing::deal_game;
use crate::domain::rules::RuleTable;
use crate::domain::state::{Direction, GameState, PlayerId};
use crate::domain::{Card, Color, Rank};

/// Generate a playable (non-wild) Color
pub fn color() -> impl Strategy<Value = Color> {
    prop_oneof![
        Just(Color::Red),
        Just(Color::Yellow),
        Just(Color::Green),
        Just(Color::Blue),
    ]
}

pub fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Forward), Just(Direction::Reverse)]
}

/// Generate any card that exists in the classic deck
pub fn card() -> impl Strategy<Value = Card> {
    prop_oneof![
        4 => (0u8..=9, color()).prop_map(|(v, c)| Card::number(v, c)),
        1 => (
            prop_oneof![Just(Rank::Skip), Just(Rank::Reverse), Just(Rank::DrawTwo)],
            color()
        )
            .prop_map(|(r, c)| Card::new(r, c)),
        1 => prop_oneof![Just(Card::wild()), Just(Card::wild_draw_four())],
    ]
}

/// Player ids for a table of 2..=max players
pub fn players(max: usize) -> impl Strategy<Value = Vec<PlayerId>> {
    (2..=max).prop_map(|n| (1..=n as PlayerId).collect())
}

/// A freshly dealt classic game for 2..=6 players
pub fn dealt_game() -> impl Strategy<Value = GameState> {
    (players(6), any::<u64>()).prop_filter_map("deal failed", |(ids, seed)| {
        use rand::SeedableRng;
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);
        deal_game(&ids, &RuleTable::classic(), &mut rng).ok()
    })
}
