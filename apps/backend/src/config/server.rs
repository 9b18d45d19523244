use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;

/// Timing and capacity knobs for every session task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// How long a disconnected player keeps their seat.
    pub reconnect_grace: Duration,
    /// How long a finished (or emptied) room stays reachable.
    pub finished_linger: Duration,
    /// Bounded command queue size per session.
    pub queue_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reconnect_grace: Duration::from_secs(60),
            finished_linger: Duration::from_secs(30),
            queue_capacity: 64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub session: SessionConfig,
    pub rules_path: Option<String>,
}

impl ServerConfig {
    /// Read `THREEUP_*` variables, falling back to defaults when unset.
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = SessionConfig::default();
        let session = SessionConfig {
            reconnect_grace: Duration::from_secs(parse_var(
                "THREEUP_RECONNECT_GRACE_SECS",
                defaults.reconnect_grace.as_secs(),
            )?),
            finished_linger: Duration::from_secs(parse_var(
                "THREEUP_FINISHED_LINGER_SECS",
                defaults.finished_linger.as_secs(),
            )?),
            queue_capacity: parse_var("THREEUP_SESSION_QUEUE", defaults.queue_capacity)?,
        };
        if session.queue_capacity == 0 {
            return Err(AppError::config("THREEUP_SESSION_QUEUE must be at least 1"));
        }

        Ok(Self {
            host: env::var("THREEUP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_var("THREEUP_PORT", 3001)?,
            session,
            rules_path: env::var("THREEUP_RULES_PATH")
                .ok()
                .filter(|s| !s.trim().is_empty()),
        })
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

/// Parse an optional environment variable, or return `default` when unset.
fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, AppError>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::config(format!("{name}={raw:?} is invalid: {e}"))),
        Err(_) => Ok(default),
    }
}
