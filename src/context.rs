//! Shared per-invocation state
//!
//! One `ContextState` is built at process entry and passed by reference to
//! every operation. It owns the selected runner, the session manager, and
//! the telemetry collector for exactly one invocation; nothing here is
//! shared across processes except the session store file.

use crate::backend::{BackendRegistry, BackendSession};
use crate::config::BosunConfig;
use crate::error::CommandError;
use crate::runner::{select_runner, Runner};
use crate::session::store::SessionStore;
use crate::session::SessionManager;
use crate::telemetry::TelemetryCollector;
use crate::workflow::WorkflowProgress;
use std::sync::Arc;
use tracing::info;

pub struct ContextState {
    pub config: BosunConfig,
    pub env: String,
    pub runner: Arc<dyn Runner>,
    pub registry: BackendRegistry,
    pub sessions: SessionManager,
    pub telemetry: Arc<TelemetryCollector>,
    pub workflow_state: Option<WorkflowProgress>,
    pub verbose: bool,
    pub quiet: bool,
}

impl std::fmt::Debug for ContextState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextState")
            .field("env", &self.env)
            .field("runner", &self.runner.label())
            .field("verbose", &self.verbose)
            .field("quiet", &self.quiet)
            .finish_non_exhaustive()
    }
}

impl ContextState {
    /// Build the invocation context: select the runner for `env` and wire
    /// the session manager to the configured store.
    pub fn new(
        config: BosunConfig,
        env: impl Into<String>,
        registry: BackendRegistry,
    ) -> Result<Self, CommandError> {
        let env = env.into();
        let runner: Arc<dyn Runner> = select_runner(&env, &config)?.into();
        info!(env = %env, runner = %runner.label(), "Context initialized");

        let store = SessionStore::from_config(&config);

        Ok(Self {
            sessions: SessionManager::new(store),
            runner,
            registry,
            config,
            env,
            telemetry: Arc::new(TelemetryCollector::new()),
            workflow_state: None,
            verbose: false,
            quiet: false,
        })
    }

    pub fn with_verbosity(mut self, verbose: bool, quiet: bool) -> Self {
        self.verbose = verbose;
        self.quiet = quiet;
        self
    }

    /// Connected backend session for `domain`, created on first use.
    pub fn session(&mut self, domain: &str) -> Result<&mut BackendSession, CommandError> {
        self.sessions
            .ensure(domain, &self.config, &self.env, &self.runner, &self.registry)
    }

    /// Teardown: export live session state to the persistent store.
    pub fn finish(&mut self) {
        let env = self.env.clone();
        self.sessions.export_sessions(&env);
    }
}
