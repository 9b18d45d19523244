//! Per-room state machine: Waiting → Active → Finished.
//!
//! A `Session` is plain data owned by exactly one actor task (see
//! `game::actor`). Every method runs to completion inside a single command
//! handler, so validation and mutation are never interleaved with another
//! command. Errors leave the state untouched.

use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, error, info};
use unicode_normalization::UnicodeNormalization;

use crate::domain::game_transition::{apply_delta, check_invariants, forfeit_seat};
use crate::domain::player_view::{view_for, TableView};
use crate::domain::rules::{validate, Action, Move, RuleTable};
use crate::domain::{
    deal_game, display_cards, GameState, PlayerId, Presence, SeatView, SessionId, SessionStatus, StateView,
    TurnEvent, TurnLog,
};
use crate::errors::domain::DomainError;
use crate::errors::SessionError;
use crate::ws::protocol::ServerMsg;

pub const MAX_NAME_CHARS: usize = 24;

/// A player in the room's roster. Roster order is join order.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub presence: Presence,
    pub is_host: bool,
    /// Bumped on every disconnect and reconnect; reconnection timers carry
    /// the epoch they were armed with and are ignored once it moves on.
    pub epoch: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinOutcome {
    pub player_id: PlayerId,
    pub reconnected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectOutcome {
    /// Removed from a waiting room.
    Left { room_empty: bool },
    /// Marked inactive mid-game; a reconnection timer should be armed.
    Inactive { epoch: u64 },
    /// Nothing to do (unknown player, already inactive, or game over).
    Ignored,
}

/// Public room summary served over HTTP.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub room_id: SessionId,
    pub status: SessionStatus,
    pub players: Vec<SeatView>,
    pub version: u64,
    pub winner: Option<PlayerId>,
}

pub struct Session {
    id: SessionId,
    rules: Arc<RuleTable>,
    status: SessionStatus,
    players: Vec<Player>,
    next_player_id: PlayerId,
    game: Option<GameState>,
    total_cards: usize,
    version: u64,
    log: TurnLog,
    winner: Option<PlayerId>,
    rng: ChaCha8Rng,
}

/// Trim, NFC-normalize and bound a display name.
pub fn normalize_name(raw: &str) -> Result<String, SessionError> {
    let name: String = raw.trim().nfc().collect();
    let chars = name.chars().count();
    if chars == 0 {
        return Err(SessionError::InvalidName("name is empty".to_string()));
    }
    if chars > MAX_NAME_CHARS {
        return Err(SessionError::InvalidName(format!(
            "name is longer than {MAX_NAME_CHARS} characters"
        )));
    }
    if name.chars().any(char::is_control) {
        return Err(SessionError::InvalidName(
            "name contains control characters".to_string(),
        ));
    }
    Ok(name)
}

impl Session {
    pub fn new(id: SessionId, rules: Arc<RuleTable>, seed: u64) -> Self {
        Self {
            id,
            rules,
            status: SessionStatus::Waiting,
            players: Vec::new(),
            next_player_id: 1,
            game: None,
            total_cards: 0,
            version: 0,
            log: TurnLog::new(),
            winner: None,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn game(&self) -> Option<&GameState> {
        self.game.as_ref()
    }

    /// Waiting room with nobody left in it.
    pub fn is_abandoned(&self) -> bool {
        self.status == SessionStatus::Waiting && self.players.is_empty()
    }

    fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    fn bump(&mut self) -> u64 {
        self.version += 1;
        self.version
    }

    pub fn join(&mut self, raw_name: &str) -> Result<JoinOutcome, SessionError> {
        let name = normalize_name(raw_name)?;
        match self.status {
            SessionStatus::Finished => Err(SessionError::SessionFinished),
            SessionStatus::Waiting => {
                if self.players.iter().any(|p| p.name == name) {
                    return Err(SessionError::NameTaken(name));
                }
                if self.players.len() >= self.rules.max_players {
                    return Err(SessionError::RoomFull);
                }
                let id = self.next_player_id;
                self.next_player_id += 1;
                let is_host = self.players.is_empty();
                self.players.push(Player {
                    id,
                    name,
                    presence: Presence::Active,
                    is_host,
                    epoch: 0,
                });
                self.bump();
                info!(session_id = %self.id, player_id = id, is_host, "[SESSION] Player joined");
                Ok(JoinOutcome {
                    player_id: id,
                    reconnected: false,
                })
            }
            SessionStatus::Active => {
                let Some(player) = self.players.iter_mut().find(|p| p.name == name) else {
                    return Err(SessionError::GameInProgress);
                };
                match player.presence {
                    Presence::Active => Err(SessionError::NameTaken(name)),
                    Presence::Forfeited => Err(SessionError::PlayerForfeited),
                    Presence::Inactive => {
                        player.presence = Presence::Active;
                        player.epoch += 1;
                        let id = player.id;
                        let version = self.bump();
                        self.log.record(version, id, TurnEvent::Reconnected);
                        info!(session_id = %self.id, player_id = id, "[SESSION] Player reconnected");
                        Ok(JoinOutcome {
                            player_id: id,
                            reconnected: true,
                        })
                    }
                }
            }
        }
    }

    pub fn start(&mut self, requester: PlayerId) -> Result<(), SessionError> {
        match self.status {
            SessionStatus::Waiting => {}
            SessionStatus::Active => return Err(SessionError::AlreadyStarted),
            SessionStatus::Finished => return Err(SessionError::SessionFinished),
        }
        let player = self.player(requester).ok_or(SessionError::UnknownPlayer)?;
        if !player.is_host {
            return Err(SessionError::NotHost);
        }
        if self.players.len() < self.rules.min_players {
            return Err(SessionError::NotEnoughPlayers {
                min: self.rules.min_players,
                have: self.players.len(),
            });
        }

        let ids: Vec<PlayerId> = self.players.iter().map(|p| p.id).collect();
        let game = deal_game(&ids, &self.rules, &mut self.rng)
            .map_err(|e| SessionError::Corrupted(e.to_string()))?;
        self.total_cards = game.total_cards();
        self.game = Some(game);
        self.status = SessionStatus::Active;
        let version = self.bump();
        self.log.record(version, requester, TurnEvent::Started);
        info!(
            session_id = %self.id,
            players = ids.len(),
            version,
            "[SESSION] Game started"
        );
        Ok(())
    }

    /// Validate and apply one move. On an internal invariant failure the
    /// session is finished with no winner and `Corrupted` is returned.
    pub fn submit(&mut self, player: PlayerId, action: Action) -> Result<(), SessionError> {
        match self.status {
            SessionStatus::Finished => return Err(SessionError::SessionFinished),
            SessionStatus::Waiting => return Err(SessionError::GameNotStarted),
            SessionStatus::Active => {}
        }
        match self.player(player).map(|p| p.presence) {
            None => return Err(SessionError::UnknownPlayer),
            Some(Presence::Inactive) => return Err(SessionError::PlayerInactive),
            Some(Presence::Forfeited) => return Err(SessionError::PlayerForfeited),
            Some(Presence::Active) => {}
        }
        let Some(game) = self.game.as_mut() else {
            return self.corrupt(DomainError::invariant("active session without a game"));
        };

        let mv = Move { player, action };
        let delta = validate(game, &self.rules, &mv)?;

        let applied = match apply_delta(game, &delta, &mut self.rng)
            .and_then(|applied| check_invariants(game, self.total_cards).map(|()| applied))
        {
            Ok(applied) => applied,
            Err(e) => return self.corrupt(e),
        };

        let version = self.bump();
        let event = if delta.played.is_empty() {
            TurnEvent::Drew {
                count: applied.drawn.len() as u32,
            }
        } else {
            TurnEvent::Played {
                cards: delta.played.clone(),
                declared_color: delta.declared_color,
            }
        };
        self.log.record(version, player, event);
        debug!(
            session_id = %self.id,
            player_id = player,
            version,
            cards = %display_cards(&delta.played),
            effect = ?delta.effect,
            "[SESSION] Move applied"
        );

        if let Some(winner) = applied.winner {
            self.finish(Some(winner));
        }
        Ok(())
    }

    pub fn disconnect(&mut self, player: PlayerId) -> DisconnectOutcome {
        match self.status {
            SessionStatus::Finished => DisconnectOutcome::Ignored,
            SessionStatus::Waiting => {
                let Some(pos) = self.players.iter().position(|p| p.id == player) else {
                    return DisconnectOutcome::Ignored;
                };
                let left = self.players.remove(pos);
                if left.is_host {
                    if let Some(next) = self.players.first_mut() {
                        next.is_host = true;
                    }
                }
                self.bump();
                info!(session_id = %self.id, player_id = player, "[SESSION] Player left waiting room");
                DisconnectOutcome::Left {
                    room_empty: self.players.is_empty(),
                }
            }
            SessionStatus::Active => {
                let Some(p) = self.player_mut(player) else {
                    return DisconnectOutcome::Ignored;
                };
                if p.presence != Presence::Active {
                    return DisconnectOutcome::Ignored;
                }
                p.presence = Presence::Inactive;
                p.epoch += 1;
                let epoch = p.epoch;
                let version = self.bump();
                self.log.record(version, player, TurnEvent::Disconnected);
                info!(session_id = %self.id, player_id = player, epoch, "[SESSION] Player inactive");
                DisconnectOutcome::Inactive { epoch }
            }
        }
    }

    /// Reconnection window elapsed. Returns whether the player was forfeited;
    /// stale timers (player reconnected since) are ignored.
    pub fn expire(&mut self, player: PlayerId, epoch: u64) -> bool {
        if self.status != SessionStatus::Active {
            return false;
        }
        match self.player_mut(player) {
            Some(p) if p.presence == Presence::Inactive && p.epoch == epoch => {
                p.presence = Presence::Forfeited;
            }
            _ => return false,
        }

        let Some(game) = self.game.as_mut() else {
            self.abort(&DomainError::invariant("active session without a game"));
            return true;
        };
        let sole = match forfeit_seat(game, player, &mut self.rng) {
            Ok(sole) => sole,
            Err(e) => {
                self.abort(&e);
                return true;
            }
        };
        let empty = game.seats.is_empty();
        if !empty {
            if let Err(e) = check_invariants(game, self.total_cards) {
                self.abort(&e);
                return true;
            }
        }

        let version = self.bump();
        self.log.record(version, player, TurnEvent::Forfeited);
        info!(session_id = %self.id, player_id = player, "[SESSION] Player forfeited");

        if let Some(winner) = sole {
            self.finish(Some(winner));
        } else if empty {
            self.finish(None);
        }
        true
    }

    fn finish(&mut self, winner: Option<PlayerId>) {
        self.status = SessionStatus::Finished;
        self.winner = winner;
        let version = self.bump();
        if let Some(w) = winner {
            self.log.record(version, w, TurnEvent::Won);
        }
        info!(session_id = %self.id, winner = ?winner, version, "[SESSION] Game finished");
    }

    /// Invariant violated: end this session with no winner.
    fn abort(&mut self, err: &DomainError) {
        error!(session_id = %self.id, error = %err, "[SESSION] Invariant violated; ending session");
        self.finish(None);
    }

    fn corrupt(&mut self, err: DomainError) -> Result<(), SessionError> {
        self.abort(&err);
        Err(SessionError::Corrupted(err.to_string()))
    }

    fn table_view(&self) -> TableView {
        TableView {
            version: self.version,
            status: self.status,
            players: self.seat_views(),
            recent: self.log.recent(),
            winner: self.winner,
        }
    }

    fn seat_views(&self) -> Vec<SeatView> {
        self.players
            .iter()
            .map(|p| SeatView {
                id: p.id,
                name: p.name.clone(),
                cards: self
                    .game
                    .as_ref()
                    .and_then(|g| g.hand_of(p.id))
                    .map_or(0, <[_]>::len),
                presence: p.presence,
                is_host: p.is_host,
            })
            .collect()
    }

    pub fn view_for(&self, player: PlayerId) -> StateView {
        view_for(&self.table_view(), self.game.as_ref(), &self.rules, player)
    }

    /// One message list per player still in the room: a fresh view, plus the
    /// game-over notice once finished.
    pub fn broadcast_messages(&self) -> Vec<(PlayerId, ServerMsg)> {
        let table = self.table_view();
        let mut out = Vec::new();
        for p in self.players.iter().filter(|p| p.presence != Presence::Forfeited) {
            let view = view_for(&table, self.game.as_ref(), &self.rules, p.id);
            out.push((p.id, ServerMsg::StateView(view)));
            if self.status == SessionStatus::Finished {
                out.push((
                    p.id,
                    ServerMsg::GameOver {
                        winner: self.winner,
                    },
                ));
            }
        }
        out
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            room_id: self.id.clone(),
            status: self.status,
            players: self.seat_views(),
            version: self.version,
            winner: self.winner,
        }
    }
}
