//! Session layer: per-room state machines, their actor tasks, and the
//! process-wide registry.

pub mod actor;
pub mod registry;
pub mod room_code;
pub mod session;

pub use actor::{SessionCommand, SessionHandle};
pub use registry::SessionRegistry;
pub use session::{JoinOutcome, Session, SessionSummary};

use crate::domain::{PlayerId, SessionId};
use crate::ws::protocol::ServerMsg;

/// Where sessions push outbound messages. Delivery is best-effort: a missing
/// or dead recipient is skipped, never an error for the session.
pub trait Outbox: Send + Sync + 'static {
    fn deliver(&self, session: &SessionId, player: PlayerId, msg: ServerMsg);

    /// Deliver per-recipient messages for one room, in order.
    fn broadcast(&self, session: &SessionId, messages: Vec<(PlayerId, ServerMsg)>) {
        for (player, msg) in messages {
            self.deliver(session, player, msg);
        }
    }
}
