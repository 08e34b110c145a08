//! Built-in demo backends: one illustrative implementation pair per domain.
//!
//! These stand in for real tool clients; they fill configuration defaults on
//! connect and answer with displayable result strings.

use crate::backend::BackendRegistry;
use crate::backend::BackendSession;

mod bitbucket;
mod git;
mod klocwork;
mod p4;
mod perforce_swarm;
mod sonarqube;

pub use bitbucket::BitbucketReviewBackend;
pub use git::GitBackend;
pub use klocwork::KlocworkAnalysisBackend;
pub use p4::P4Backend;
pub use perforce_swarm::PerforceSwarmReviewBackend;
pub use sonarqube::SonarqubeAnalysisBackend;

/// Register every demo backend under its conventional name.
pub fn register_builtin(registry: &mut BackendRegistry) {
    registry.register(
        "scm",
        "git",
        Box::new(|init| Ok(BackendSession::Scm(Box::new(GitBackend::new(init))))),
    );
    registry.register(
        "scm",
        "p4",
        Box::new(|init| Ok(BackendSession::Scm(Box::new(P4Backend::new(init))))),
    );
    registry.register(
        "analysis",
        "sonarqube",
        Box::new(|init| {
            Ok(BackendSession::Analysis(Box::new(
                SonarqubeAnalysisBackend::new(init),
            )))
        }),
    );
    registry.register(
        "analysis",
        "klocwork",
        Box::new(|init| {
            Ok(BackendSession::Analysis(Box::new(
                KlocworkAnalysisBackend::new(init),
            )))
        }),
    );
    registry.register(
        "review",
        "bitbucket",
        Box::new(|init| {
            Ok(BackendSession::Review(Box::new(
                BitbucketReviewBackend::new(init),
            )))
        }),
    );
    registry.register(
        "review",
        "perforce-swarm",
        Box::new(|init| {
            Ok(BackendSession::Review(Box::new(
                PerforceSwarmReviewBackend::new(init),
            )))
        }),
    );
}

/// String value from a backend config table, with a fallback.
fn config_str(config: &toml::Table, key: &str, default: &str) -> String {
    config
        .get(key)
        .and_then(|value| value.as_str())
        .unwrap_or(default)
        .to_string()
}

/// Seed a default value without clobbering explicit configuration.
fn seed_default(config: &mut toml::Table, key: &str, value: &str) {
    config
        .entry(key.to_string())
        .or_insert_with(|| toml::Value::String(value.to_string()));
}
