//! Error codes for the threeup server.
//!
//! Every code the server emits, over HTTP problem details or inside a
//! websocket `rejected`/`error` message, is defined here. Add new codes here;
//! never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear on the wire.

use core::fmt;

use serde::{Serialize, Serializer};

/// Centralized error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Request Validation
    /// Malformed or unexpected request
    BadRequest,
    /// Card token could not be parsed
    ParseCard,
    /// Display name empty, too long, or otherwise unusable
    InvalidName,
    /// Room code has the wrong shape
    InvalidRoomCode,

    // Rule Violations
    /// Acting player does not hold the turn
    NotYourTurn,
    /// Played card is not in the acting player's hand
    CardNotInHand,
    /// Card matches neither color nor rank of the discard top
    IllegalPlay,
    /// A draw penalty is pending and must be answered
    MustRespondToPenalty,
    /// A wild was played without choosing a color
    DeclaredColorRequired,
    /// Several cards played that cannot go down together
    IllegalCombination,
    /// A play with no cards
    EmptyPlay,

    // Session State
    /// Session already finished
    SessionFinished,
    /// No session with this id
    SessionNotFound,
    /// Player is disconnected and inside their reconnection window
    PlayerInactive,
    /// Player forfeited and is out of the game
    PlayerForfeited,
    /// Room is mid-game and does not accept new players
    GameInProgress,
    /// Room has not started yet
    GameNotStarted,
    /// Start requested twice
    AlreadyStarted,
    /// Only the host may start the game
    NotHost,
    /// Not enough players to start
    NotEnoughPlayers,
    /// Room is at its player limit
    RoomFull,
    /// Display name already used in this room
    NameTaken,
    /// Player id does not belong to this room
    UnknownPlayer,
    /// Connection has not joined a room yet
    NotJoined,
    /// Connection already joined a room
    AlreadyJoined,
    /// Session queue is full; retry
    SessionBusy,

    // System Errors
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
    /// A session detected corrupted state and stopped
    DataCorruption,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            // Request Validation
            Self::BadRequest => "BAD_REQUEST",
            Self::ParseCard => "PARSE_CARD",
            Self::InvalidName => "INVALID_NAME",
            Self::InvalidRoomCode => "INVALID_ROOM_CODE",

            // Rule Violations
            Self::NotYourTurn => "NOT_YOUR_TURN",
            Self::CardNotInHand => "CARD_NOT_IN_HAND",
            Self::IllegalPlay => "ILLEGAL_PLAY",
            Self::MustRespondToPenalty => "MUST_RESPOND_TO_PENALTY",
            Self::DeclaredColorRequired => "DECLARED_COLOR_REQUIRED",
            Self::IllegalCombination => "ILLEGAL_COMBINATION",
            Self::EmptyPlay => "EMPTY_PLAY",

            // Session State
            Self::SessionFinished => "SESSION_FINISHED",
            Self::SessionNotFound => "SESSION_NOT_FOUND",
            Self::PlayerInactive => "PLAYER_INACTIVE",
            Self::PlayerForfeited => "PLAYER_FORFEITED",
            Self::GameInProgress => "GAME_IN_PROGRESS",
            Self::GameNotStarted => "GAME_NOT_STARTED",
            Self::AlreadyStarted => "ALREADY_STARTED",
            Self::NotHost => "NOT_HOST",
            Self::NotEnoughPlayers => "NOT_ENOUGH_PLAYERS",
            Self::RoomFull => "ROOM_FULL",
            Self::NameTaken => "NAME_TAKEN",
            Self::UnknownPlayer => "UNKNOWN_PLAYER",
            Self::NotJoined => "NOT_JOINED",
            Self::AlreadyJoined => "ALREADY_JOINED",
            Self::SessionBusy => "SESSION_BUSY",

            // System Errors
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
            Self::DataCorruption => "DATA_CORRUPTION",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}
