//! Persistent session store
//!
//! The only state shared across invocations: a small TOML file mapping
//! (environment, domain) to the metadata a backend exported, tagged with the
//! backend name that minted it. Absent or unreadable files are treated as
//! empty; writes are whole-file and last-writer-wins.

use crate::backend::SessionBlob;
use crate::config::BosunConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::warn;

/// One persisted record: the backend that minted it plus its opaque metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub backend: String,

    #[serde(default)]
    pub data: SessionBlob,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreFile {
    /// environment -> domain -> record
    #[serde(default)]
    envs: BTreeMap<String, BTreeMap<String, SessionRecord>>,
}

/// Lightweight persistent cache for backend session metadata
pub struct SessionStore {
    path: PathBuf,
    data: StoreFile,
    loaded: bool,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            data: StoreFile::default(),
            loaded: false,
        }
    }

    /// Default location under the per-user config directory.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "bosun")
            .map(|dirs| dirs.config_dir().join("sessions.toml"))
    }

    /// Store at the configured path, or the per-user default.
    pub fn from_config(config: &BosunConfig) -> Self {
        let path = config
            .cache
            .sessions_path
            .clone()
            .or_else(Self::default_path)
            .unwrap_or_else(|| PathBuf::from(".bosun-sessions.toml"));
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_loaded(&mut self) {
        if self.loaded {
            return;
        }
        self.loaded = true;

        if !self.path.exists() {
            return;
        }

        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(error) => {
                warn!(
                    path = %self.path.display(),
                    %error,
                    "Ignoring unreadable session store"
                );
                return;
            }
        };

        match toml::from_str::<StoreFile>(&content) {
            Ok(data) => self.data = data,
            Err(error) => {
                warn!(
                    path = %self.path.display(),
                    %error,
                    "Ignoring malformed session store"
                );
            }
        }
    }

    /// Record for (environment, domain), if one was persisted.
    pub fn get(&mut self, env: &str, domain: &str) -> Option<&SessionRecord> {
        self.ensure_loaded();
        self.data.envs.get(env).and_then(|domains| domains.get(domain))
    }

    /// Stage a record for (environment, domain). Not written until `persist`.
    pub fn set(&mut self, env: &str, domain: &str, record: SessionRecord) {
        self.ensure_loaded();
        self.data
            .envs
            .entry(env.to_string())
            .or_default()
            .insert(domain.to_string(), record);
    }

    /// Write the store to disk, creating parent directories as needed.
    pub fn persist(&self) -> Result<(), std::io::Error> {
        let content = toml::to_string_pretty(&self.data)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, content)
    }
}
