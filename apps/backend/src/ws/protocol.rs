use serde::{Deserialize, Serialize};

use crate::domain::{Card, Color, PlayerId, SessionId, StateView};
use crate::errors::ErrorCode;

pub const PROTOCOL_VERSION: i32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    Join {
        session_id: String,
        display_name: String,
    },
    Start,
    PlayCard {
        cards: Vec<Card>,
        #[serde(default)]
        declared_color: Option<Color>,
    },
    Draw,
}

#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    Welcome {
        protocol: i32,
    },

    Joined {
        session_id: SessionId,
        player_id: PlayerId,
    },

    StateView(StateView),

    Rejected {
        reason: ErrorCode,
        message: String,
    },

    GameOver {
        winner: Option<PlayerId>,
    },

    Error {
        code: ErrorCode,
        message: String,
    },
}

impl ServerMsg {
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        ServerMsg::Error {
            code,
            message: message.into(),
        }
    }
}
