//! Backend session lifecycle
//!
//! The session manager guarantees at most one `connect()` per domain per
//! context lifetime and hands the connected backend to every later
//! operation. Connection failures propagate; they are never retried here.

use crate::backend::{BackendInit, BackendRegistry, BackendSession};
use crate::config::BosunConfig;
use crate::error::CommandError;
use crate::runner::Runner;
use crate::session::store::{SessionRecord, SessionStore};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

pub mod store;

pub struct SessionManager {
    sessions: HashMap<String, BackendSession>,
    store: SessionStore,
}

impl SessionManager {
    pub fn new(store: SessionStore) -> Self {
        Self {
            sessions: HashMap::new(),
            store,
        }
    }

    /// Connected session for `domain`, created on first use.
    ///
    /// Later calls return the memoized handle without side effects.
    pub fn ensure(
        &mut self,
        domain: &str,
        config: &BosunConfig,
        env: &str,
        runner: &Arc<dyn Runner>,
        registry: &BackendRegistry,
    ) -> Result<&mut BackendSession, CommandError> {
        match self.sessions.entry(domain.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let session = open_session(domain, config, env, runner, registry, &mut self.store)?;
                Ok(entry.insert(session))
            }
        }
    }

    /// Whether a session is already connected for `domain`.
    pub fn contains(&self, domain: &str) -> bool {
        self.sessions.contains_key(domain)
    }

    /// Export hook, run at context teardown: persist session state for every
    /// connected backend that offers it. Failures here only cost future-run
    /// reuse; they are logged and swallowed.
    pub fn export_sessions(&mut self, env: &str) {
        let mut dirty = false;

        for (domain, session) in self.sessions.iter_mut() {
            let backend = session.name().to_string();
            if let Some(state) = session.session_state() {
                let record = SessionRecord {
                    backend,
                    data: state.export(),
                };
                self.store.set(env, domain, record);
                dirty = true;
            }
        }

        if dirty {
            if let Err(error) = self.store.persist() {
                warn!(
                    path = %self.store.path().display(),
                    %error,
                    "Failed to persist session store"
                );
            }
        }
    }
}

fn open_session(
    domain: &str,
    config: &BosunConfig,
    env: &str,
    runner: &Arc<dyn Runner>,
    registry: &BackendRegistry,
    store: &mut SessionStore,
) -> Result<BackendSession, CommandError> {
    let backend_name = config.backend_name(domain)?;
    let merged = config.merged_backend_config(backend_name, env);

    let init = BackendInit {
        name: backend_name.to_string(),
        config: merged,
        env: env.to_string(),
        runner: Arc::clone(runner),
    };
    let mut session = registry.construct(domain, backend_name, init)?;

    if let Some(state) = session.session_state() {
        if let Some(record) = store.get(env, domain) {
            if record.backend == backend_name {
                state.restore(&record.data);
                debug!(domain, backend = backend_name, "Restored persisted session state");
            }
        }
    }

    session.connect().map_err(|error| match error {
        already @ CommandError::BackendConnection { .. } => already,
        other => CommandError::BackendConnection {
            domain: domain.to_string(),
            backend: backend_name.to_string(),
            reason: other.to_string(),
        },
    })?;

    debug!(domain, backend = backend_name, env, "Connected backend");
    Ok(session)
}
