use std::sync::Arc;

use crate::config::{ServerConfig, SessionConfig};
use crate::domain::rules::RuleTable;
use crate::game::{Outbox, SessionRegistry};
use crate::ws::hub::{ConnectionHub, ConnectionLinks};

/// Application state shared by every handler and websocket actor.
#[derive(Clone)]
pub struct AppState {
    hub: Arc<ConnectionHub>,
    registry: SessionRegistry,
}

impl AppState {
    /// Wire links, registry and hub together.
    pub fn new(rules: RuleTable, session: SessionConfig) -> Self {
        let links = Arc::new(ConnectionLinks::new());
        let outbox: Arc<dyn Outbox> = links.clone();
        let registry = SessionRegistry::new(Arc::new(rules), session, outbox);
        let hub = Arc::new(ConnectionHub::new(links, registry.clone()));
        Self { hub, registry }
    }

    pub fn from_config(config: &ServerConfig, rules: RuleTable) -> Self {
        Self::new(rules, config.session.clone())
    }

    pub fn hub(&self) -> Arc<ConnectionHub> {
        self.hub.clone()
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Classic rules and default timings.
    pub fn for_tests() -> Self {
        Self::new(RuleTable::classic(), SessionConfig::default())
    }
}
