#![allow(dead_code)]

// tests/common/mod.rs
use std::time::Duration;

use serde_json::Value;
use threeup::config::SessionConfig;

// Logging is auto-installed for every test binary
#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

/// Session timings short enough for tests that wait on timers.
pub fn fast_session_config() -> SessionConfig {
    SessionConfig {
        reconnect_grace: Duration::from_millis(80),
        finished_linger: Duration::from_millis(150),
        queue_capacity: 64,
    }
}

/// Fast reconnect grace, but rooms outlive a slow client handshake.
pub fn short_grace_session_config() -> SessionConfig {
    SessionConfig {
        reconnect_grace: Duration::from_millis(80),
        finished_linger: Duration::from_secs(2),
        queue_capacity: 64,
    }
}

/// Timings long enough that no timer fires during a test.
pub fn slow_session_config() -> SessionConfig {
    SessionConfig {
        reconnect_grace: Duration::from_secs(600),
        finished_linger: Duration::from_secs(600),
        queue_capacity: 64,
    }
}

/// Seat entry for `player_id` in a `state_view` or summary.
pub fn seat<'a>(view: &'a Value, player_id: u64) -> &'a Value {
    view["players"]
        .as_array()
        .and_then(|players| players.iter().find(|p| p["id"] == player_id))
        .expect("player present in view")
}
