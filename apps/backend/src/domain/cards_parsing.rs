//! Card text form (e.g., "R5", "GS", "B+2", "W", "W+4")
//!
//! First character is the color (R, Y, G, B, or W for wilds); the rest is the
//! rank: a digit, `S` (skip), `R` (reverse), `+2` (draw two). Wilds are `W`
//! and `W+4`. Parsing is case-insensitive; display is always upper-case.

use std::fmt;
use std::str::FromStr;

use super::cards_types::{Card, Color, Rank};
use crate::errors::domain::{DomainError, ValidationKind};

fn parse_error(s: &str) -> DomainError {
    DomainError::validation(ValidationKind::ParseCard, format!("Parse card: {s}"))
}

impl FromStr for Card {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let mut chars = upper.chars();
        let color_ch = chars.next().ok_or_else(|| parse_error(s))?;
        let rest = chars.as_str();

        let color = match color_ch {
            'R' => Color::Red,
            'Y' => Color::Yellow,
            'G' => Color::Green,
            'B' => Color::Blue,
            'W' => {
                return match rest {
                    "" => Ok(Card::wild()),
                    "+4" => Ok(Card::wild_draw_four()),
                    _ => Err(parse_error(s)),
                }
            }
            _ => return Err(parse_error(s)),
        };

        let rank = match rest {
            "S" => Rank::Skip,
            "R" => Rank::Reverse,
            "+2" => Rank::DrawTwo,
            digit if digit.len() == 1 => {
                let value = digit
                    .chars()
                    .next()
                    .and_then(|c| c.to_digit(10))
                    .ok_or_else(|| parse_error(s))?;
                Rank::Number(value as u8)
            }
            _ => return Err(parse_error(s)),
        };

        Ok(Card { rank, color })
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let color = match self.color {
            Color::Red => 'R',
            Color::Yellow => 'Y',
            Color::Green => 'G',
            Color::Blue => 'B',
            Color::Wild => 'W',
        };
        match self.rank {
            Rank::Wild => f.write_str("W"),
            Rank::WildDrawFour => f.write_str("W+4"),
            Rank::Number(n) => write!(f, "{color}{n}"),
            Rank::Skip => write!(f, "{color}S"),
            Rank::Reverse => write!(f, "{color}R"),
            Rank::DrawTwo => write!(f, "{color}+2"),
        }
    }
}

/// Render a pile of cards for logs and the turn log, e.g. "[R5] [R5]".
pub fn display_cards(cards: &[Card]) -> String {
    cards
        .iter()
        .map(|c| format!("[{c}]"))
        .collect::<Vec<_>>()
        .join(" ")
}
