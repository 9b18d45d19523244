//! Core card-related types: Card, Rank, Color

use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Red,
    Yellow,
    Green,
    Blue,
    /// Carried by wild-ranked cards only. Never a legal declared color.
    Wild,
}

impl Color {
    /// The four colors a player may declare after a wild.
    pub const PLAYABLE: [Color; 4] = [Color::Red, Color::Yellow, Color::Green, Color::Blue];

    pub fn is_wild(self) -> bool {
        matches!(self, Color::Wild)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Rank {
    /// Face value 0..=9.
    Number(u8),
    Skip,
    Reverse,
    DrawTwo,
    Wild,
    WildDrawFour,
}

/// Rank without the face value; the key used by the rule table.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankKind {
    Number,
    Skip,
    Reverse,
    DrawTwo,
    Wild,
    WildDrawFour,
}

impl Rank {
    pub fn kind(self) -> RankKind {
        match self {
            Rank::Number(_) => RankKind::Number,
            Rank::Skip => RankKind::Skip,
            Rank::Reverse => RankKind::Reverse,
            Rank::DrawTwo => RankKind::DrawTwo,
            Rank::Wild => RankKind::Wild,
            Rank::WildDrawFour => RankKind::WildDrawFour,
        }
    }

    pub fn is_wild(self) -> bool {
        matches!(self, Rank::Wild | Rank::WildDrawFour)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Card {
    pub rank: Rank,
    pub color: Color,
}

impl Card {
    pub const fn new(rank: Rank, color: Color) -> Self {
        Self { rank, color }
    }

    pub const fn number(value: u8, color: Color) -> Self {
        Self::new(Rank::Number(value), color)
    }

    pub const fn wild() -> Self {
        Self::new(Rank::Wild, Color::Wild)
    }

    pub const fn wild_draw_four() -> Self {
        Self::new(Rank::WildDrawFour, Color::Wild)
    }

    pub fn is_wild(&self) -> bool {
        self.rank.is_wild()
    }
}

// Note: Ord on Card is only for stable hand sorting: color order R<Y<G<B<W then rank.
// Play legality never compares cards by order.
impl Ord for Card {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.color.cmp(&other.color) {
            std::cmp::Ordering::Equal => self.rank.cmp(&other.rank),
            ord => ord,
        }
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
