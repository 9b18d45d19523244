/// Property-based tests for move validation and state transitions
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::domain::dealing::deal_game;
use crate::domain::game_transition::{apply_delta, check_invariants};
use crate::domain::rules::{playable_cards, validate, Action, Move, RuleTable};
use crate::domain::state::{next_seat, PlayerId};
use crate::domain::test_state_helpers::game_with;
use crate::domain::{test_gens, test_prelude, Card, Color};
use crate::errors::Rejection;

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: Card conservation
    /// Any sequence of legal moves keeps hands + draw pile + discard constant.
    #[test]
    fn prop_card_conservation_over_legal_games(
        n in 2usize..=6,
        seed in any::<u64>(),
        choices in prop::collection::vec(any::<u16>(), 1..200),
    ) {
        let rules = RuleTable::classic();
        let ids: Vec<PlayerId> = (1..=n as PlayerId).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut state = deal_game(&ids, &rules, &mut rng).unwrap();
        let total = state.total_cards();
        prop_assert_eq!(total, 108);

        for choice in choices {
            let player = state.current_player().unwrap();
            let playable = playable_cards(&state, &rules, player);
            let action = if playable.is_empty() || choice % 5 == 0 {
                Action::Draw
            } else {
                let card = playable[choice as usize % playable.len()];
                Action::Play {
                    cards: vec![card],
                    declared_color: card
                        .is_wild()
                        .then_some(Color::PLAYABLE[choice as usize % 4]),
                }
            };
            let delta = validate(&state, &rules, &Move { player, action }).unwrap();
            let applied = apply_delta(&mut state, &delta, &mut rng).unwrap();
            check_invariants(&state, total).unwrap();
            if applied.winner.is_some() {
                break;
            }
        }
    }

    /// Property: Out-of-turn moves are refused before any other check
    #[test]
    fn prop_out_of_turn_is_not_your_turn(
        game in test_gens::dealt_game(),
        card in test_gens::card(),
        offset in 1usize..6,
    ) {
        let seats = game.seats.len();
        let other = game.seats[(game.turn + 1 + offset % (seats - 1)) % seats].player;
        prop_assert_ne!(Some(other), game.current_player());

        let mv = Move {
            player: other,
            action: Action::Play { cards: vec![card], declared_color: Some(Color::Red) },
        };
        prop_assert_eq!(validate(&game, &RuleTable::classic(), &mv), Err(Rejection::NotYourTurn));
        let draw = Move { player: other, action: Action::Draw };
        prop_assert_eq!(validate(&game, &RuleTable::classic(), &draw), Err(Rejection::NotYourTurn));
    }

    /// Property: A non-effect card advances the turn by exactly one seat
    #[test]
    fn prop_plain_card_advances_one_seat(
        seats in 2usize..=8,
        turn_seed in any::<usize>(),
        direction in test_gens::direction(),
        color in test_gens::color(),
        value in 0u8..=9,
    ) {
        let hands: Vec<Vec<Card>> = (0..seats)
            .map(|_| vec![Card::number(value, color), Card::number(value, color)])
            .collect();
        let mut state = game_with(hands, Card::number(value, color));
        state.turn = turn_seed % seats;
        state.direction = direction;
        let player = state.current_player().unwrap();

        let mv = Move {
            player,
            action: Action::Play { cards: vec![Card::number(value, color)], declared_color: None },
        };
        let delta = validate(&state, &RuleTable::classic(), &mv).unwrap();

        prop_assert_eq!(delta.next_turn, next_seat(state.turn, seats, direction));
        prop_assert_eq!(delta.direction, direction);
    }
}
