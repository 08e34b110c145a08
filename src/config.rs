//! Configuration System
//!
//! Layered configuration for environments, backends, and workflows. Sources
//! merge in order: defaults, the per-user global file, an explicit
//! `--config` file, then `BOSUN_` environment variables. Backend settings
//! additionally support per-environment overlays resolved at session time.

use crate::error::CommandError;
use crate::logging::LoggingConfig;
use crate::workflow::WorkflowStep;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

mod sources;

pub use sources::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BosunConfig {
    /// Backend selection per domain, e.g. `backends.scm = "git"`
    #[serde(default)]
    pub backends: HashMap<String, String>,

    /// Base backend settings keyed by backend name
    #[serde(default)]
    pub backend_configs: HashMap<String, toml::Table>,

    /// Per-environment settings: runner selection and backend overlays
    #[serde(default)]
    pub envs: HashMap<String, EnvConfig>,

    /// Named workflows as ordered step lists
    #[serde(default)]
    pub workflows: HashMap<String, Vec<WorkflowStep>>,

    /// Session cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Per-environment configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EnvConfig {
    /// Runner for this environment; absent means run locally
    #[serde(default)]
    pub runner: Option<RunnerConfig>,

    /// Backend settings that override the base `backend_configs` entries
    /// when this environment is active
    #[serde(default)]
    pub backend_configs: HashMap<String, toml::Table>,
}

/// Runner selection for one environment.
///
/// `type` stays a plain string so an unsupported value surfaces as a
/// configuration error at selection time instead of a parse failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Runner type: local, docker, k8s (or kubernetes)
    #[serde(rename = "type", default = "default_runner_type")]
    pub runner_type: String,

    /// Working directory for local execution
    #[serde(default)]
    pub cwd: Option<PathBuf>,

    /// Container name (docker)
    #[serde(default)]
    pub container: Option<String>,

    /// Docker client binary
    #[serde(default = "default_docker_bin")]
    pub docker_bin: String,

    /// Pod name (k8s)
    #[serde(default)]
    pub pod: Option<String>,

    /// Pod namespace (k8s); cluster default when absent
    #[serde(default)]
    pub namespace: Option<String>,

    /// Kubectl client binary
    #[serde(default = "default_kubectl_bin")]
    pub kubectl_bin: String,
}

fn default_runner_type() -> String {
    "local".to_string()
}

fn default_docker_bin() -> String {
    "docker".to_string()
}

fn default_kubectl_bin() -> String {
    "kubectl".to_string()
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            runner_type: default_runner_type(),
            cwd: None,
            container: None,
            docker_bin: default_docker_bin(),
            pod: None,
            namespace: None,
            kubectl_bin: default_kubectl_bin(),
        }
    }
}

/// Session cache configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CacheConfig {
    /// Session store file path (default: per-user config directory)
    #[serde(default)]
    pub sessions_path: Option<PathBuf>,
}

impl BosunConfig {
    /// Backend name configured for `domain`.
    pub fn backend_name(&self, domain: &str) -> Result<&str, CommandError> {
        self.backends
            .get(domain)
            .map(String::as_str)
            .ok_or_else(|| {
                CommandError::Configuration(format!(
                    "No backend configured for domain '{domain}'"
                ))
            })
    }

    /// Backend settings for `name` with the overlay for `env` applied.
    /// Environment-specific keys win on conflict.
    pub fn merged_backend_config(&self, name: &str, env: &str) -> toml::Table {
        let mut merged = self
            .backend_configs
            .get(name)
            .cloned()
            .unwrap_or_default();

        if let Some(env_config) = self.envs.get(env) {
            if let Some(overrides) = env_config.backend_configs.get(name) {
                for (key, value) in overrides {
                    merged.insert(key.clone(), value.clone());
                }
            }
        }

        merged
    }

    /// Step list for the named workflow.
    pub fn workflow_steps(&self, name: &str) -> Result<&[WorkflowStep], CommandError> {
        self.workflows
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| {
                CommandError::Configuration(format!(
                    "Workflow '{name}' is not defined in config"
                ))
            })
    }
}

/// Loader for the layered configuration sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the global file, an optional explicit file,
    /// and `BOSUN_` environment variables. Missing files are tolerated; an
    /// empty configuration is valid until a specific key is looked up.
    pub fn load(explicit: Option<&Path>) -> Result<BosunConfig, CommandError> {
        let mut builder = Config::builder();
        builder = sources::add_global_file(builder);

        if let Some(path) = explicit {
            if path.exists() {
                builder = builder.add_source(File::from(path).required(false));
            } else {
                tracing::warn!(
                    config_path = %path.display(),
                    "Configuration file not found; continuing with defaults"
                );
            }
        }

        builder = builder.add_source(Environment::with_prefix("BOSUN").separator("__"));

        let merged = builder
            .build()
            .map_err(|e| CommandError::Configuration(format!("Failed to load config: {e}")))?;

        merged
            .try_deserialize()
            .map_err(|e| CommandError::Configuration(format!("Invalid config: {e}")))
    }

    /// Load configuration from a single file, bypassing the global sources.
    pub fn load_from_file(path: &Path) -> Result<BosunConfig, CommandError> {
        let merged = Config::builder()
            .add_source(File::from(path))
            .build()
            .map_err(|e| {
                CommandError::Configuration(format!(
                    "Failed to load config file {}: {e}",
                    path.display()
                ))
            })?;

        merged
            .try_deserialize()
            .map_err(|e| CommandError::Configuration(format!("Invalid config: {e}")))
    }
}
