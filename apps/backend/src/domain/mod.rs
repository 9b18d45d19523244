//! Domain layer: pure game logic types and helpers.

pub mod cards_parsing;
pub mod cards_serde;
pub mod cards_types;
pub mod dealing;
pub mod deck;
pub mod game_transition;
pub mod player_view;
pub mod rules;
pub mod state;
pub mod turn_log;

#[cfg(test)]
mod test_gens;
#[cfg(test)]
mod test_prelude;
#[cfg(test)]
mod test_state_helpers;
#[cfg(test)]
mod tests_props_rules;

// Re-exports for ergonomics
pub use cards_parsing::display_cards;
pub use cards_types::{Card, Color, Rank, RankKind};
pub use dealing::deal_game;
pub use player_view::{SeatView, StateView};
pub use rules::{validate, Action, Move, RuleTable, StateDelta};
pub use state::{Direction, GameState, PlayerId, Presence, SessionId, SessionStatus};
pub use turn_log::{TurnEvent, TurnLog};
