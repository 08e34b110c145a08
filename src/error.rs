//! Error types for the bosun command orchestration layer.

use thiserror::Error;

/// Errors raised while executing a command in an environment
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Cannot execute an empty command")]
    EmptyCommand,

    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Command-level errors surfaced by dispatch, sessions, and workflows
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Backend '{name}' is not registered for domain '{domain}'. Known backends: {known}")]
    UnknownBackend {
        domain: String,
        name: String,
        known: String,
    },

    #[error("Failed to connect to backend '{backend}' for domain '{domain}': {reason}")]
    BackendConnection {
        domain: String,
        backend: String,
        reason: String,
    },

    #[error("Runner execution failed: {0}")]
    Runner(#[from] RunnerError),

    #[error("Backend operation failed: {0}")]
    Backend(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Workflow '{name}' completed with {failed} failed step(s)")]
    WorkflowFailed { name: String, failed: usize },
}
