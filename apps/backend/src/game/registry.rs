//! Process-wide map of room id to running session.
//!
//! Injected through `AppState`; there is no global instance.

use std::sync::{Arc, Weak};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{info, warn};

use crate::config::SessionConfig;
use crate::domain::rules::RuleTable;
use crate::domain::SessionId;
use crate::errors::SessionError;
use crate::game::actor::{spawn_session, SessionHandle};
use crate::game::room_code::generate_room_code;
use crate::game::session::Session;
use crate::game::Outbox;

const MAX_CODE_ATTEMPTS: usize = 32;

struct RegistryInner {
    sessions: DashMap<SessionId, SessionHandle>,
    rules: Arc<RuleTable>,
    config: SessionConfig,
    outbox: Arc<dyn Outbox>,
}

#[derive(Clone)]
pub struct SessionRegistry {
    inner: Arc<RegistryInner>,
}

impl SessionRegistry {
    pub fn new(rules: Arc<RuleTable>, config: SessionConfig, outbox: Arc<dyn Outbox>) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                sessions: DashMap::new(),
                rules,
                config,
                outbox,
            }),
        }
    }

    /// Create a room with a random deck seed.
    pub fn create(&self) -> Result<SessionId, SessionError> {
        self.create_with_seed(rand::random())
    }

    /// Create a room whose shuffles are reproducible from `seed`.
    pub fn create_with_seed(&self, seed: u64) -> Result<SessionId, SessionError> {
        let mut rng = rand::rng();
        for _ in 0..MAX_CODE_ATTEMPTS {
            let id = generate_room_code(&mut rng);
            let Entry::Vacant(slot) = self.inner.sessions.entry(id.clone()) else {
                continue;
            };
            let session = Session::new(id.clone(), self.inner.rules.clone(), seed);
            let weak: Weak<RegistryInner> = Arc::downgrade(&self.inner);
            let handle = spawn_session(
                session,
                self.inner.config.clone(),
                self.inner.outbox.clone(),
                move |id| {
                    if let Some(inner) = weak.upgrade() {
                        inner.sessions.remove_if(id, |_, h| h.is_closed());
                    }
                },
            );
            slot.insert(handle);
            info!(session_id = %id, "[SESSION] Room created");
            return Ok(id);
        }
        warn!("[SESSION] Could not find a free room code");
        Err(SessionError::Busy)
    }

    pub fn get(&self, id: &SessionId) -> Result<SessionHandle, SessionError> {
        self.inner
            .sessions
            .get(id)
            .map(|h| h.value().clone())
            .ok_or_else(|| SessionError::SessionNotFound(id.clone()))
    }

    /// Remove a room and stop its task. Returns whether it existed.
    pub async fn destroy(&self, id: &SessionId) -> bool {
        match self.inner.sessions.remove(id) {
            Some((_, handle)) => {
                handle.shutdown().await;
                info!(session_id = %id, "[SESSION] Room destroyed");
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.inner.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.sessions.is_empty()
    }

    /// Stop every session; used on server shutdown.
    pub async fn shutdown_all(&self) {
        let handles: Vec<SessionHandle> = self
            .inner
            .sessions
            .iter()
            .map(|e| e.value().clone())
            .collect();
        self.inner.sessions.clear();
        for handle in handles {
            handle.shutdown().await;
        }
        info!("[SESSION] All rooms shut down");
    }
}
