use std::sync::Arc;
use std::time::{Duration, Instant};

use actix::prelude::*;
use actix::WeakRecipient;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::rules::Action;
use crate::errors::{ErrorCode, SessionError};
use crate::game::JoinOutcome;
use crate::state::app_state::AppState;
use crate::ws::hub::{ConnId, ConnectionHub, DeliveryError, Mailbox};
use crate::ws::protocol::{ClientMsg, ServerMsg, PROTOCOL_VERSION};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);
const MAILBOX_CAPACITY: usize = 256;

pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let session = WsSession::new(Uuid::new_v4(), app_state.hub());
    ws::start(session, &req, stream)
}

/// Outcome of a join that ran detached from the actor.
#[derive(Message)]
#[rtype(result = "()")]
struct JoinFinished(Result<JoinOutcome, SessionError>);

/// A message pushed to the client by the hub or a session.
#[derive(Message, Clone)]
#[rtype(result = "()")]
pub struct Outbound(pub ServerMsg);

impl Mailbox for WeakRecipient<Outbound> {
    fn send(&self, msg: ServerMsg) -> Result<(), DeliveryError> {
        let recipient = self.upgrade().ok_or(DeliveryError::Closed)?;
        recipient.try_send(Outbound(msg)).map_err(|e| match e {
            SendError::Full(_) => DeliveryError::Full,
            SendError::Closed(_) => DeliveryError::Closed,
        })
    }
}

pub struct WsSession {
    conn_id: ConnId,
    hub: Arc<ConnectionHub>,

    last_heartbeat: Instant,
    heartbeat_handle: Option<actix::SpawnHandle>,

    /// Set once a join has been sent; a second join is refused locally.
    join_sent: bool,
}

impl WsSession {
    fn new(conn_id: ConnId, hub: Arc<ConnectionHub>) -> Self {
        Self {
            conn_id,
            hub,
            last_heartbeat: Instant::now(),
            heartbeat_handle: None,
            join_sent: false,
        }
    }

    fn send_json(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerMsg) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "[WS SESSION] failed to serialize outbound message"),
        }
    }

    fn send_error(ctx: &mut ws::WebsocketContext<Self>, code: ErrorCode, message: impl Into<String>) {
        Self::send_json(ctx, &ServerMsg::error(code, message));
    }

    fn send_error_and_close(
        &self,
        ctx: &mut ws::WebsocketContext<Self>,
        code: ErrorCode,
        message: impl Into<String>,
    ) {
        Self::send_error(ctx, code, message);
        ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
        ctx.stop();
    }

    fn send_rejected(ctx: &mut ws::WebsocketContext<Self>, err: &SessionError) {
        Self::send_json(
            ctx,
            &ServerMsg::Rejected {
                reason: err.code(),
                message: err.to_string(),
            },
        );
    }

    fn start_heartbeat(&mut self, ctx: &mut ws::WebsocketContext<Self>) {
        let handle = ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(conn_id = %actor.conn_id, "[WS SESSION] heartbeat timed out");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
        self.heartbeat_handle = Some(handle);
    }

    fn handle_client_msg(&mut self, cmd: ClientMsg, ctx: &mut ws::WebsocketContext<Self>) {
        let hub = self.hub.clone();
        let conn_id = self.conn_id;

        match cmd {
            ClientMsg::Join {
                session_id,
                display_name,
            } => {
                if self.join_sent {
                    Self::send_rejected(ctx, &SessionError::AlreadyJoined);
                    return;
                }
                self.join_sent = true;
                // Not tied to the actor's lifetime: an accepted join must reach
                // the hub's binding step even if the socket closes meanwhile.
                let addr = ctx.address();
                actix::spawn(async move {
                    let res = hub.join(conn_id, &session_id, display_name).await;
                    addr.do_send(JoinFinished(res));
                });
            }
            ClientMsg::Start => {
                ctx.spawn(
                    async move { hub.start(conn_id).await }
                        .into_actor(self)
                        .map(|res, _actor, ctx| {
                            if let Err(err) = res {
                                Self::send_rejected(ctx, &err);
                            }
                        }),
                );
            }
            ClientMsg::PlayCard {
                cards,
                declared_color,
            } => self.submit(
                Action::Play {
                    cards,
                    declared_color,
                },
                ctx,
            ),
            ClientMsg::Draw => self.submit(Action::Draw, ctx),
        }
    }

    fn submit(&mut self, action: Action, ctx: &mut ws::WebsocketContext<Self>) {
        let hub = self.hub.clone();
        let conn_id = self.conn_id;
        ctx.spawn(
            async move { hub.submit(conn_id, action).await }
                .into_actor(self)
                .map(|res, actor, ctx| {
                    if let Err(err) = res {
                        if matches!(err, SessionError::Corrupted(_)) {
                            warn!(conn_id = %actor.conn_id, error = %err, "[WS SESSION] move hit a corrupted session");
                        }
                        Self::send_rejected(ctx, &err);
                    }
                }),
        );
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(conn_id = %self.conn_id, "[WS SESSION] started");

        ctx.set_mailbox_capacity(MAILBOX_CAPACITY);
        let mailbox: WeakRecipient<Outbound> = ctx.address().recipient().downgrade();
        self.hub.connect(self.conn_id, Arc::new(mailbox));

        Self::send_json(
            ctx,
            &ServerMsg::Welcome {
                protocol: PROTOCOL_VERSION,
            },
        );
        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        let hub = self.hub.clone();
        let conn_id = self.conn_id;
        actix::spawn(async move {
            hub.disconnect(conn_id).await;
        });
        info!(conn_id = %self.conn_id, "[WS SESSION] stopped");
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();

                let Ok(value) = serde_json::from_str::<serde_json::Value>(&text) else {
                    warn!(conn_id = %self.conn_id, "[WS SESSION] malformed JSON");
                    self.send_error_and_close(ctx, ErrorCode::BadRequest, "Malformed JSON");
                    return;
                };
                match serde_json::from_value::<ClientMsg>(value) {
                    Ok(cmd) => self.handle_client_msg(cmd, ctx),
                    Err(err) => {
                        warn!(conn_id = %self.conn_id, error = %err, "[WS SESSION] bad client message");
                        let code = if err.to_string().starts_with("Invalid card") {
                            ErrorCode::ParseCard
                        } else {
                            ErrorCode::BadRequest
                        };
                        Self::send_error(ctx, code, err.to_string());
                    }
                }
            }
            Ok(ws::Message::Binary(_)) => {
                self.last_heartbeat = Instant::now();
                self.send_error_and_close(ctx, ErrorCode::BadRequest, "Binary not supported");
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(
                    conn_id = %self.conn_id,
                    error = %err,
                    "[WS SESSION] protocol error"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}

impl Handler<Outbound> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: Outbound, ctx: &mut Self::Context) -> Self::Result {
        Self::send_json(ctx, &msg.0);
    }
}

impl Handler<JoinFinished> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: JoinFinished, ctx: &mut Self::Context) -> Self::Result {
        if let Err(err) = msg.0 {
            // Joined rooms are final; a failed join may be retried.
            self.join_sent = false;
            info!(conn_id = %self.conn_id, error = %err, "[WS SESSION] join refused");
            Self::send_rejected(ctx, &err);
        }
    }
}
