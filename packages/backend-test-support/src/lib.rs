//! Backend test support utilities
//!
//! Shared by the backend's unit and integration tests: one logging initializer
//! and a small JSON websocket client for driving a live server.

pub mod logging;
pub mod ws_client;
