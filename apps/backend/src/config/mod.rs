//! Runtime configuration read from the environment.

pub mod rules;
pub mod server;

pub use rules::{load_rules, rules_from_env};
pub use server::{ServerConfig, SessionConfig};
