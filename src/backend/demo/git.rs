//! Demo Git SCM backend.

use crate::backend::demo::{config_str, seed_default};
use crate::backend::{Backend, BackendInit, ScmBackend};
use crate::error::CommandError;

pub struct GitBackend {
    name: String,
    config: toml::Table,
    connected: bool,
}

impl GitBackend {
    pub fn new(init: BackendInit) -> Self {
        Self {
            name: init.name,
            config: init.config,
            connected: false,
        }
    }

    fn ensure_connected(&mut self) -> Result<(), CommandError> {
        if !self.connected {
            self.connect()?;
        }
        Ok(())
    }
}

impl Backend for GitBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn connect(&mut self) -> Result<(), CommandError> {
        seed_default(&mut self.config, "repo", "https://example.com/demo.git");
        seed_default(&mut self.config, "branch", "main");
        self.connected = true;
        Ok(())
    }
}

impl ScmBackend for GitBackend {
    fn sync(&mut self) -> Result<String, CommandError> {
        self.ensure_connected()?;
        Ok(format!(
            "git pull {} {}",
            config_str(&self.config, "repo", "https://example.com/demo.git"),
            config_str(&self.config, "branch", "main")
        ))
    }

    fn status(&mut self) -> Result<String, CommandError> {
        self.ensure_connected()?;
        Ok("git status --short: clean".to_string())
    }

    fn submit(&mut self, message: &str) -> Result<String, CommandError> {
        self.ensure_connected()?;
        Ok(format!("git push with commit message: {message}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::LocalRunner;
    use std::sync::Arc;

    fn init_with(config: toml::Table) -> BackendInit {
        BackendInit {
            name: "git".to_string(),
            config,
            env: "local".to_string(),
            runner: Arc::new(LocalRunner::new("local")),
        }
    }

    #[test]
    fn test_sync_uses_config_defaults() {
        let mut backend = GitBackend::new(init_with(toml::Table::new()));
        backend.connect().unwrap();
        assert_eq!(
            backend.sync().unwrap(),
            "git pull https://example.com/demo.git main"
        );
    }

    #[test]
    fn test_sync_honors_configured_repo() {
        let mut config = toml::Table::new();
        config.insert(
            "repo".to_string(),
            toml::Value::String("https://example.com/app.git".to_string()),
        );
        let mut backend = GitBackend::new(init_with(config));
        backend.connect().unwrap();
        assert_eq!(
            backend.sync().unwrap(),
            "git pull https://example.com/app.git main"
        );
    }

    #[test]
    fn test_operations_connect_lazily() {
        let mut backend = GitBackend::new(init_with(toml::Table::new()));
        assert_eq!(backend.status().unwrap(), "git status --short: clean");
        assert!(backend.connected);
    }
}
