//! Demo Perforce SCM backend.

use crate::backend::demo::{config_str, seed_default};
use crate::backend::{Backend, BackendInit, ScmBackend};
use crate::error::CommandError;

pub struct P4Backend {
    name: String,
    config: toml::Table,
    connected: bool,
}

impl P4Backend {
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

    fn workspace(&self) -> String {
        config_str(&self.config, "workspace", "demo-workspace")
    }
}

impl Backend for P4Backend {
    fn name(&self) -> &str {
        &self.name
    }

    fn connect(&mut self) -> Result<(), CommandError> {
        seed_default(&mut self.config, "server", "perforce:1666");
        seed_default(&mut self.config, "workspace", "demo-workspace");
        self.connected = true;
        Ok(())
    }
}

impl ScmBackend for P4Backend {
    fn sync(&mut self) -> Result<String, CommandError> {
        self.ensure_connected()?;
        Ok(format!(
            "p4 sync against {} in workspace {}",
            config_str(&self.config, "server", "perforce:1666"),
            self.workspace()
        ))
    }

    fn status(&mut self) -> Result<String, CommandError> {
        self.ensure_connected()?;
        Ok("p4 opened files: none (clean workspace)".to_string())
    }

    fn submit(&mut self, message: &str) -> Result<String, CommandError> {
        self.ensure_connected()?;
        Ok(format!(
            "p4 submit from {} with message: {message}",
            self.workspace()
        ))
    }
}
