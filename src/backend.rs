//! Backend contracts and the registry mapping (domain, name) pairs to
//! constructors.
//!
//! A backend connects one domain (scm, analysis, review) to a concrete
//! external tool. Implementations are registered at process start; the core
//! performs no runtime code loading.

use crate::error::CommandError;
use crate::runner::Runner;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

pub mod demo;

/// Opaque session metadata persisted across invocations
pub type SessionBlob = BTreeMap<String, String>;

/// Everything a backend constructor receives
pub struct BackendInit {
    pub name: String,
    pub config: toml::Table,
    pub env: String,
    pub runner: Arc<dyn Runner>,
}

/// Restore/export capability for backends with reusable session state
pub trait SessionState {
    /// Seed session state from a persisted blob, before `connect`.
    fn restore(&mut self, blob: &SessionBlob);

    /// Export session state for persistence, at context teardown.
    fn export(&self) -> SessionBlob;
}

/// Common backend surface: identity and connection lifecycle
pub trait Backend {
    fn name(&self) -> &str;

    /// Establish the backend connection. The session manager calls this at
    /// most once per domain per context.
    fn connect(&mut self) -> Result<(), CommandError>;

    /// Restore/export capability, when the backend keeps reusable session
    /// state. Default: none.
    fn session_state(&mut self) -> Option<&mut dyn SessionState> {
        None
    }
}

/// Interface for source control management backends
pub trait ScmBackend: Backend {
    /// Synchronize the working tree.
    fn sync(&mut self) -> Result<String, CommandError>;

    /// Return status information for the working tree.
    fn status(&mut self) -> Result<String, CommandError>;

    /// Submit changes to the remote repository or review system.
    fn submit(&mut self, message: &str) -> Result<String, CommandError>;
}

/// Interface for analysis backends
pub trait AnalysisBackend: Backend {
    /// Run an analysis scan.
    fn scan(&mut self) -> Result<String, CommandError>;

    /// Produce an analysis report in the requested format.
    fn report(&mut self, format: &str) -> Result<String, CommandError>;
}

/// Interface for review backends
pub trait ReviewBackend: Backend {
    /// Create a review or review request.
    fn create_review(&mut self, subject: &str) -> Result<String, CommandError>;

    /// Create a comment on a review or change.
    fn comment(&mut self, body: &str) -> Result<String, CommandError>;

    /// Approve a review.
    fn approve(&mut self, message: &str) -> Result<String, CommandError>;
}

/// A connected backend handle for one domain
pub enum BackendSession {
    Scm(Box<dyn ScmBackend>),
    Analysis(Box<dyn AnalysisBackend>),
    Review(Box<dyn ReviewBackend>),
}

impl std::fmt::Debug for BackendSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let domain = match self {
            BackendSession::Scm(_) => "Scm",
            BackendSession::Analysis(_) => "Analysis",
            BackendSession::Review(_) => "Review",
        };
        f.debug_struct("BackendSession")
            .field("domain", &domain)
            .field("name", &self.name())
            .finish()
    }
}

impl BackendSession {
    pub fn name(&self) -> &str {
        match self {
            BackendSession::Scm(backend) => backend.name(),
            BackendSession::Analysis(backend) => backend.name(),
            BackendSession::Review(backend) => backend.name(),
        }
    }

    pub fn connect(&mut self) -> Result<(), CommandError> {
        match self {
            BackendSession::Scm(backend) => backend.connect(),
            BackendSession::Analysis(backend) => backend.connect(),
            BackendSession::Review(backend) => backend.connect(),
        }
    }

    pub fn session_state(&mut self) -> Option<&mut dyn SessionState> {
        match self {
            BackendSession::Scm(backend) => backend.session_state(),
            BackendSession::Analysis(backend) => backend.session_state(),
            BackendSession::Review(backend) => backend.session_state(),
        }
    }

    pub fn as_scm(&mut self) -> Result<&mut dyn ScmBackend, CommandError> {
        match self {
            BackendSession::Scm(backend) => Ok(backend.as_mut()),
            _ => Err(CommandError::Backend(format!(
                "Backend '{}' is not an SCM backend",
                self.name()
            ))),
        }
    }

    pub fn as_analysis(&mut self) -> Result<&mut dyn AnalysisBackend, CommandError> {
        match self {
            BackendSession::Analysis(backend) => Ok(backend.as_mut()),
            _ => Err(CommandError::Backend(format!(
                "Backend '{}' is not an analysis backend",
                self.name()
            ))),
        }
    }

    pub fn as_review(&mut self) -> Result<&mut dyn ReviewBackend, CommandError> {
        match self {
            BackendSession::Review(backend) => Ok(backend.as_mut()),
            _ => Err(CommandError::Backend(format!(
                "Backend '{}' is not a review backend",
                self.name()
            ))),
        }
    }
}

/// Constructor producing an unconnected backend session
pub type BackendConstructor =
    Box<dyn Fn(BackendInit) -> Result<BackendSession, CommandError> + Send + Sync>;

/// Registry of backend constructors keyed by (domain, name)
pub struct BackendRegistry {
    backends: HashMap<String, HashMap<String, BackendConstructor>>,
}

impl BackendRegistry {
    /// Empty registry with the standard domains pre-seeded.
    pub fn new() -> Self {
        let mut backends = HashMap::new();
        for domain in ["scm", "analysis", "review"] {
            backends.insert(domain.to_string(), HashMap::new());
        }
        Self { backends }
    }

    /// Registry populated with the built-in demo backends.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        demo::register_builtin(&mut registry);
        registry
    }

    /// Register a backend constructor for a given domain.
    pub fn register(
        &mut self,
        domain: impl Into<String>,
        name: impl Into<String>,
        constructor: BackendConstructor,
    ) {
        self.backends
            .entry(domain.into())
            .or_default()
            .insert(name.into(), constructor);
    }

    /// Instantiate the registered backend for (domain, name).
    pub fn construct(
        &self,
        domain: &str,
        name: &str,
        init: BackendInit,
    ) -> Result<BackendSession, CommandError> {
        let constructor = self
            .backends
            .get(domain)
            .and_then(|entries| entries.get(name));

        match constructor {
            Some(constructor) => constructor(init),
            None => Err(CommandError::UnknownBackend {
                domain: domain.to_string(),
                name: name.to_string(),
                known: self.known_names(domain),
            }),
        }
    }

    /// Registered backend names for a domain, sorted.
    pub fn registered(&self, domain: &str) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .backends
            .get(domain)
            .map(|entries| entries.keys().map(String::as_str).collect())
            .unwrap_or_default();
        names.sort_unstable();
        names
    }

    fn known_names(&self, domain: &str) -> String {
        let names = self.registered(domain);
        if names.is_empty() {
            "none".to_string()
        } else {
            names.join(", ")
        }
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}
