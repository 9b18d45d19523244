//! Websocket transport: per-connection actors, the connection hub, and the
//! JSON message protocol.

pub mod hub;
pub mod protocol;
pub mod session;

pub use hub::{ConnId, ConnectionHub, ConnectionLinks, DeliveryError, Mailbox};
pub use protocol::{ClientMsg, ServerMsg, PROTOCOL_VERSION};
