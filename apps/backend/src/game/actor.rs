//! One tokio task per session.
//!
//! The task is the only owner of its [`Session`]. Everything else talks to it
//! through a [`SessionHandle`], which pushes commands onto a bounded queue and
//! awaits a oneshot reply. Accepted mutations are followed by a per-recipient
//! broadcast through the [`Outbox`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::domain::rules::Action;
use crate::domain::{PlayerId, SessionId, SessionStatus};
use crate::errors::SessionError;
use crate::game::session::{DisconnectOutcome, JoinOutcome, Session, SessionSummary};
use crate::game::Outbox;
use crate::ws::protocol::ServerMsg;

type Reply<T> = oneshot::Sender<Result<T, SessionError>>;

#[derive(Debug)]
pub enum SessionCommand {
    Join {
        display_name: String,
        reply: Reply<JoinOutcome>,
    },
    Start {
        player: PlayerId,
        reply: Reply<()>,
    },
    Submit {
        player: PlayerId,
        action: Action,
        reply: Reply<()>,
    },
    Disconnect {
        player: PlayerId,
    },
    /// Re-send the current view to one player (after binding a connection).
    Resync {
        player: PlayerId,
    },
    Summary {
        reply: oneshot::Sender<SessionSummary>,
    },
    /// Reconnection window for `player` elapsed.
    Expire {
        player: PlayerId,
        epoch: u64,
    },
    /// Finished/abandoned grace period elapsed.
    Linger,
    Shutdown,
}

/// Cloneable address of a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    id: SessionId,
    tx: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    fn enqueue(&self, cmd: SessionCommand) -> Result<(), SessionError> {
        self.tx.try_send(cmd).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => SessionError::Busy,
            mpsc::error::TrySendError::Closed(_) => SessionError::SessionFinished,
        })
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(Reply<T>) -> SessionCommand,
    ) -> Result<T, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.enqueue(make(reply))?;
        rx.await.map_err(|_| SessionError::SessionFinished)?
    }

    pub async fn join(&self, display_name: String) -> Result<JoinOutcome, SessionError> {
        self.request(|reply| SessionCommand::Join {
            display_name,
            reply,
        })
        .await
    }

    pub async fn start(&self, player: PlayerId) -> Result<(), SessionError> {
        self.request(|reply| SessionCommand::Start { player, reply })
            .await
    }

    pub async fn submit(&self, player: PlayerId, action: Action) -> Result<(), SessionError> {
        self.request(|reply| SessionCommand::Submit {
            player,
            action,
            reply,
        })
        .await
    }

    /// Disconnects must not be dropped on a full queue, so this waits for room.
    pub async fn disconnect(&self, player: PlayerId) {
        if self
            .tx
            .send(SessionCommand::Disconnect { player })
            .await
            .is_err()
        {
            debug!(session_id = %self.id, player_id = player, "[SESSION] Disconnect after session ended");
        }
    }

    pub fn resync(&self, player: PlayerId) {
        if let Err(err) = self.enqueue(SessionCommand::Resync { player }) {
            debug!(session_id = %self.id, player_id = player, error = %err, "[SESSION] Resync dropped");
        }
    }

    pub async fn summary(&self) -> Result<SessionSummary, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.enqueue(SessionCommand::Summary { reply })?;
        rx.await.map_err(|_| SessionError::SessionFinished)
    }

    pub async fn shutdown(&self) {
        let _ = self.tx.send(SessionCommand::Shutdown).await;
    }
}

/// Spawn the session task. `on_exit` runs once when the loop ends.
pub fn spawn_session(
    session: Session,
    config: SessionConfig,
    outbox: Arc<dyn Outbox>,
    on_exit: impl FnOnce(&SessionId) + Send + 'static,
) -> SessionHandle {
    let (tx, rx) = mpsc::channel(config.queue_capacity.max(1));
    let handle = SessionHandle {
        id: session.id().clone(),
        tx: tx.clone(),
    };
    let actor = SessionActor {
        session,
        config,
        outbox,
        self_tx: tx.downgrade(),
        timers: HashMap::new(),
        cancel: CancellationToken::new(),
        linger: None,
        finish_seen: false,
    };
    drop(tx);
    tokio::spawn(async move {
        let id = actor.session.id().clone();
        actor.run(rx).await;
        on_exit(&id);
    });
    handle
}

struct SessionActor {
    session: Session,
    config: SessionConfig,
    outbox: Arc<dyn Outbox>,
    self_tx: mpsc::WeakSender<SessionCommand>,
    /// Reconnection timers keyed by player, with the epoch they were armed for.
    timers: HashMap<PlayerId, (u64, CancellationToken)>,
    /// Parent of every timer; cancelled when the loop ends.
    cancel: CancellationToken,
    /// Pending reclaim check; re-arming replaces it.
    linger: Option<CancellationToken>,
    finish_seen: bool,
}

impl SessionActor {
    async fn run(mut self, mut rx: mpsc::Receiver<SessionCommand>) {
        info!(session_id = %self.session.id(), "[SESSION] Started");
        // A room nobody ever joins is reclaimed like one everybody left.
        self.arm_linger();
        while let Some(cmd) = rx.recv().await {
            if !self.handle(cmd) {
                break;
            }
        }
        self.cancel.cancel();
        info!(
            session_id = %self.session.id(),
            status = ?self.session.status(),
            version = self.session.version(),
            "[SESSION] Stopped"
        );
    }

    /// Returns false when the loop should stop.
    fn handle(&mut self, cmd: SessionCommand) -> bool {
        match cmd {
            SessionCommand::Join {
                display_name,
                reply,
            } => {
                let res = self.session.join(&display_name);
                if let Ok(outcome) = &res {
                    if outcome.reconnected {
                        self.cancel_timer(outcome.player_id);
                    }
                }
                self.reply_and_broadcast(reply, res);
            }
            SessionCommand::Start { player, reply } => {
                let res = self.session.start(player);
                self.reply_and_broadcast(reply, res);
            }
            SessionCommand::Submit {
                player,
                action,
                reply,
            } => {
                let before = self.session.version();
                let res = self.session.submit(player, action);
                // Corruption also finishes the session and bumps the version.
                let changed = self.session.version() != before;
                let _ = reply.send(res);
                if changed {
                    self.broadcast();
                }
            }
            SessionCommand::Disconnect { player } => match self.session.disconnect(player) {
                DisconnectOutcome::Left { room_empty } => {
                    self.broadcast();
                    if room_empty {
                        self.arm_linger();
                    }
                }
                DisconnectOutcome::Inactive { epoch } => {
                    self.broadcast();
                    self.arm_reconnect_timer(player, epoch);
                }
                DisconnectOutcome::Ignored => {}
            },
            SessionCommand::Resync { player } => {
                let view = self.session.view_for(player);
                self.outbox
                    .deliver(self.session.id(), player, ServerMsg::StateView(view));
                if self.session.status() == SessionStatus::Finished {
                    self.outbox.deliver(
                        self.session.id(),
                        player,
                        ServerMsg::GameOver {
                            winner: self.session.winner(),
                        },
                    );
                }
            }
            SessionCommand::Summary { reply } => {
                let _ = reply.send(self.session.summary());
            }
            SessionCommand::Expire { player, epoch } => {
                if self.timers.get(&player).is_some_and(|(armed, _)| *armed == epoch) {
                    self.timers.remove(&player);
                }
                if self.session.expire(player, epoch) {
                    self.broadcast();
                } else {
                    debug!(session_id = %self.session.id(), player_id = player, epoch, "[SESSION] Stale expiry ignored");
                }
            }
            SessionCommand::Linger => {
                if self.session.status() == SessionStatus::Finished || self.session.is_abandoned() {
                    return false;
                }
                self.linger = None;
            }
            SessionCommand::Shutdown => return false,
        }

        if self.session.status() == SessionStatus::Finished && !self.finish_seen {
            self.finish_seen = true;
            self.cancel_all_timers();
            self.arm_linger();
        }
        true
    }

    fn reply_and_broadcast<T>(&mut self, reply: Reply<T>, res: Result<T, SessionError>) {
        let ok = res.is_ok();
        if reply.send(res).is_err() {
            debug!(session_id = %self.session.id(), "[SESSION] Requester went away before reply");
        }
        if ok {
            self.broadcast();
        }
    }

    fn broadcast(&self) {
        self.outbox
            .broadcast(self.session.id(), self.session.broadcast_messages());
    }

    fn arm_reconnect_timer(&mut self, player: PlayerId, epoch: u64) {
        self.cancel_timer(player);
        let token = self.cancel.child_token();
        self.timers.insert(player, (epoch, token.clone()));
        let grace = self.config.reconnect_grace;
        let tx = self.self_tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(grace) => {
                    if let Some(tx) = tx.upgrade() {
                        let _ = tx.send(SessionCommand::Expire { player, epoch }).await;
                    }
                }
            }
        });
    }

    fn cancel_timer(&mut self, player: PlayerId) {
        if let Some((_, token)) = self.timers.remove(&player) {
            token.cancel();
        }
    }

    fn cancel_all_timers(&mut self) {
        for (_, (_, token)) in self.timers.drain() {
            token.cancel();
        }
    }

    fn arm_linger(&mut self) {
        if let Some(previous) = self.linger.take() {
            previous.cancel();
        }
        let linger: Duration = self.config.finished_linger;
        let token = self.cancel.child_token();
        self.linger = Some(token.clone());
        let tx = self.self_tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(linger) => {
                    match tx.upgrade() {
                        Some(tx) => {
                            let _ = tx.send(SessionCommand::Linger).await;
                        }
                        None => warn!("[SESSION] Linger fired after session dropped"),
                    }
                }
            }
        });
    }
}
