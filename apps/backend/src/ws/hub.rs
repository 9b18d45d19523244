//! Connection hub: maps live connections to (room, player) seats.
//!
//! Connections are held through weak [`Mailbox`]es, never owned. Sessions push
//! messages through [`ConnectionLinks`] (their [`Outbox`]); connection actors
//! call into [`ConnectionHub`] for joins and moves.

use std::sync::Arc;

use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::rules::Action;
use crate::domain::{PlayerId, SessionId};
use crate::errors::SessionError;
use crate::game::room_code::parse_room_code;
use crate::game::{JoinOutcome, Outbox, SessionHandle, SessionRegistry};
use crate::ws::protocol::ServerMsg;

pub type ConnId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeliveryError {
    #[error("connection is gone")]
    Closed,
    #[error("connection mailbox is full")]
    Full,
}

/// Weak delivery back-reference to one connection.
pub trait Mailbox: Send + Sync + 'static {
    fn send(&self, msg: ServerMsg) -> Result<(), DeliveryError>;
}

impl Mailbox for mpsc::Sender<ServerMsg> {
    fn send(&self, msg: ServerMsg) -> Result<(), DeliveryError> {
        self.try_send(msg).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => DeliveryError::Full,
            mpsc::error::TrySendError::Closed(_) => DeliveryError::Closed,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Binding {
    session: SessionId,
    player: PlayerId,
}

/// Connection and seat tables. This is the session-facing half of the hub.
#[derive(Default)]
pub struct ConnectionLinks {
    mailboxes: DashMap<ConnId, Arc<dyn Mailbox>>,
    bindings: DashMap<ConnId, Binding>,
    seats: DashMap<(SessionId, PlayerId), ConnId>,
}

impl ConnectionLinks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send(&self, conn: ConnId, msg: ServerMsg) -> Result<(), DeliveryError> {
        let mailbox = self
            .mailboxes
            .get(&conn)
            .map(|m| m.value().clone())
            .ok_or(DeliveryError::Closed)?;
        mailbox.send(msg)
    }

    fn binding(&self, conn: ConnId) -> Option<Binding> {
        self.bindings.get(&conn).map(|b| b.value().clone())
    }
}

impl Outbox for ConnectionLinks {
    fn deliver(&self, session: &SessionId, player: PlayerId, msg: ServerMsg) {
        let Some(conn) = self
            .seats
            .get(&(session.clone(), player))
            .map(|c| *c.value())
        else {
            debug!(session_id = %session, player_id = player, "[HUB] No live connection for seat");
            return;
        };
        if let Err(err) = self.send(conn, msg) {
            warn!(
                session_id = %session,
                player_id = player,
                conn_id = %conn,
                error = %err,
                "[HUB] Delivery failed; skipping"
            );
        }
    }
}

pub struct ConnectionHub {
    links: Arc<ConnectionLinks>,
    registry: SessionRegistry,
}

impl ConnectionHub {
    pub fn new(links: Arc<ConnectionLinks>, registry: SessionRegistry) -> Self {
        Self { links, registry }
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn connect(&self, conn: ConnId, mailbox: Arc<dyn Mailbox>) {
        self.links.mailboxes.insert(conn, mailbox);
        debug!(conn_id = %conn, "[HUB] Connection registered");
    }

    pub fn active_connections(&self) -> usize {
        self.links.mailboxes.len()
    }

    /// Bind `conn` to a seat. A previous connection for the same seat loses
    /// its binding, so its later disconnect no longer affects the player.
    pub fn register(&self, conn: ConnId, session: SessionId, player: PlayerId) {
        let key = (session.clone(), player);
        if let Some(old) = self.links.seats.insert(key, conn) {
            if old != conn {
                self.links.bindings.remove(&old);
                info!(session_id = %session, player_id = player, old_conn = %old, conn_id = %conn, "[HUB] Seat moved to new connection");
            }
        }
        self.links.bindings.insert(conn, Binding { session, player });
    }

    fn bound_session(&self, conn: ConnId) -> Result<(SessionHandle, PlayerId), SessionError> {
        let binding = self.links.binding(conn).ok_or(SessionError::NotJoined)?;
        let handle = self.registry.get(&binding.session)?;
        Ok((handle, binding.player))
    }

    /// Join (or rejoin) a room, then bind the connection and ask the session
    /// for a fresh view. `joined` is sent before any view.
    pub async fn join(
        &self,
        conn: ConnId,
        room: &str,
        display_name: String,
    ) -> Result<JoinOutcome, SessionError> {
        if self.links.bindings.contains_key(&conn) {
            return Err(SessionError::AlreadyJoined);
        }
        let session_id =
            parse_room_code(room).map_err(|_| SessionError::SessionNotFound(SessionId::new(room)))?;
        let handle = self.registry.get(&session_id)?;
        let outcome = handle.join(display_name).await?;

        let joined = ServerMsg::Joined {
            session_id: session_id.clone(),
            player_id: outcome.player_id,
        };
        if let Err(err) = self.links.send(conn, joined) {
            warn!(conn_id = %conn, error = %err, "[HUB] Could not confirm join");
        }
        self.register(conn, session_id.clone(), outcome.player_id);

        // The transport may have closed while the session was answering. Its
        // disconnect found no binding, so hand the seat back here.
        if !self.links.mailboxes.contains_key(&conn) {
            if self.links.bindings.remove(&conn).is_some() {
                self.links
                    .seats
                    .remove_if(&(session_id.clone(), outcome.player_id), |_, c| *c == conn);
                handle.disconnect(outcome.player_id).await;
            }
            info!(
                conn_id = %conn,
                session_id = %session_id,
                player_id = outcome.player_id,
                "[HUB] Connection closed during join; seat released"
            );
            return Ok(outcome);
        }
        handle.resync(outcome.player_id);
        info!(
            conn_id = %conn,
            session_id = %session_id,
            player_id = outcome.player_id,
            reconnected = outcome.reconnected,
            "[HUB] Connection joined room"
        );
        Ok(outcome)
    }

    pub async fn start(&self, conn: ConnId) -> Result<(), SessionError> {
        let (handle, player) = self.bound_session(conn)?;
        handle.start(player).await
    }

    pub async fn submit(&self, conn: ConnId, action: Action) -> Result<(), SessionError> {
        let (handle, player) = self.bound_session(conn)?;
        handle.submit(player, action).await
    }

    /// Transport closed: forget the connection and tell its session.
    pub async fn disconnect(&self, conn: ConnId) {
        self.links.mailboxes.remove(&conn);
        let Some((_, binding)) = self.links.bindings.remove(&conn) else {
            debug!(conn_id = %conn, "[HUB] Unbound connection closed");
            return;
        };
        self.links
            .seats
            .remove_if(&(binding.session.clone(), binding.player), |_, c| *c == conn);

        match self.registry.get(&binding.session) {
            Ok(handle) => handle.disconnect(binding.player).await,
            Err(_) => debug!(session_id = %binding.session, "[HUB] Room already gone"),
        }
        info!(
            conn_id = %conn,
            session_id = %binding.session,
            player_id = binding.player,
            "[HUB] Connection left room"
        );
    }
}
