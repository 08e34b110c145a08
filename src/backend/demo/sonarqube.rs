//! Demo SonarQube analysis backend.

use crate::backend::demo::{config_str, seed_default};
use crate::backend::{AnalysisBackend, Backend, BackendInit};
use crate::error::CommandError;

pub struct SonarqubeAnalysisBackend {
    name: String,
    config: toml::Table,
    connected: bool,
}

impl SonarqubeAnalysisBackend {
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

    fn project(&self) -> String {
        config_str(&self.config, "project", "demo-project")
    }
}

impl Backend for SonarqubeAnalysisBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn connect(&mut self) -> Result<(), CommandError> {
        seed_default(&mut self.config, "host", "https://sonarqube.example.com");
        seed_default(&mut self.config, "project", "demo-project");
        self.connected = true;
        Ok(())
    }
}

impl AnalysisBackend for SonarqubeAnalysisBackend {
    fn scan(&mut self) -> Result<String, CommandError> {
        self.ensure_connected()?;
        Ok(format!(
            "sonarqube scan for project {} at {}",
            self.project(),
            config_str(&self.config, "host", "https://sonarqube.example.com")
        ))
    }

    fn report(&mut self, format: &str) -> Result<String, CommandError> {
        self.ensure_connected()?;
        Ok(format!(
            "sonarqube report in {format} for {}",
            self.project()
        ))
    }
}
