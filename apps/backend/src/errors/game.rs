//! Game-level errors: rule violations and session state errors.
//!
//! Both are recovered at the session/connection boundary and turned into a
//! `rejected` message for the sender. None of them touch session state.

use thiserror::Error;

use crate::domain::SessionId;
use crate::errors::ErrorCode;

/// Why the rule engine refused a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("it is not your turn")]
    NotYourTurn,
    #[error("card is not in your hand")]
    CardNotInHand,
    #[error("card does not match the discard pile")]
    IllegalPlay,
    #[error("a draw penalty is pending; stack a draw card or draw")]
    MustRespondToPenalty,
    #[error("wild cards need a declared color")]
    DeclaredColorRequired,
    #[error("those cards cannot be played together")]
    IllegalCombination,
    #[error("no cards were played")]
    EmptyPlay,
}

impl Rejection {
    pub fn code(&self) -> ErrorCode {
        match self {
            Rejection::NotYourTurn => ErrorCode::NotYourTurn,
            Rejection::CardNotInHand => ErrorCode::CardNotInHand,
            Rejection::IllegalPlay => ErrorCode::IllegalPlay,
            Rejection::MustRespondToPenalty => ErrorCode::MustRespondToPenalty,
            Rejection::DeclaredColorRequired => ErrorCode::DeclaredColorRequired,
            Rejection::IllegalCombination => ErrorCode::IllegalCombination,
            Rejection::EmptyPlay => ErrorCode::EmptyPlay,
        }
    }
}

/// Errors raised by a session or on the way to one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Rejected(#[from] Rejection),
    #[error("the game has finished")]
    SessionFinished,
    #[error("room {0} not found")]
    SessionNotFound(SessionId),
    #[error("player is disconnected")]
    PlayerInactive,
    #[error("player has forfeited")]
    PlayerForfeited,
    #[error("a game is being played; try again later")]
    GameInProgress,
    #[error("the game has not started")]
    GameNotStarted,
    #[error("the game has already started")]
    AlreadyStarted,
    #[error("only the host can start the game")]
    NotHost,
    #[error("need at least {min} players, have {have}")]
    NotEnoughPlayers { min: usize, have: usize },
    #[error("room is full")]
    RoomFull,
    #[error("name {0:?} is already taken in this room")]
    NameTaken(String),
    #[error("invalid display name: {0}")]
    InvalidName(String),
    #[error("unknown player")]
    UnknownPlayer,
    #[error("join a room first")]
    NotJoined,
    #[error("connection already joined a room")]
    AlreadyJoined,
    #[error("room is busy; retry")]
    Busy,
    #[error("session state corrupted: {0}")]
    Corrupted(String),
}

impl SessionError {
    pub fn code(&self) -> ErrorCode {
        match self {
            SessionError::Rejected(r) => r.code(),
            SessionError::SessionFinished => ErrorCode::SessionFinished,
            SessionError::SessionNotFound(_) => ErrorCode::SessionNotFound,
            SessionError::PlayerInactive => ErrorCode::PlayerInactive,
            SessionError::PlayerForfeited => ErrorCode::PlayerForfeited,
            SessionError::GameInProgress => ErrorCode::GameInProgress,
            SessionError::GameNotStarted => ErrorCode::GameNotStarted,
            SessionError::AlreadyStarted => ErrorCode::AlreadyStarted,
            SessionError::NotHost => ErrorCode::NotHost,
            SessionError::NotEnoughPlayers { .. } => ErrorCode::NotEnoughPlayers,
            SessionError::RoomFull => ErrorCode::RoomFull,
            SessionError::NameTaken(_) => ErrorCode::NameTaken,
            SessionError::InvalidName(_) => ErrorCode::InvalidName,
            SessionError::UnknownPlayer => ErrorCode::UnknownPlayer,
            SessionError::NotJoined => ErrorCode::NotJoined,
            SessionError::AlreadyJoined => ErrorCode::AlreadyJoined,
            SessionError::Busy => ErrorCode::SessionBusy,
            SessionError::Corrupted(_) => ErrorCode::DataCorruption,
        }
    }

    /// Rule violations, as opposed to lifecycle/state errors.
    pub fn is_rule_violation(&self) -> bool {
        matches!(self, SessionError::Rejected(_))
    }
}
