//! Demo Perforce Swarm review backend.

use crate::backend::demo::{config_str, seed_default};
use crate::backend::{Backend, BackendInit, ReviewBackend, SessionBlob, SessionState};
use crate::error::CommandError;

pub struct PerforceSwarmReviewBackend {
    name: String,
    config: toml::Table,
    connected: bool,
    ticket: Option<String>,
}

impl PerforceSwarmReviewBackend {
    pub fn new(init: BackendInit) -> Self {
        Self {
            name: init.name,
            config: init.config,
            connected: false,
            ticket: None,
        }
    }

    fn ensure_connected(&mut self) -> Result<(), CommandError> {
        if !self.connected {
            self.connect()?;
        }
        Ok(())
    }

    fn project(&self) -> String {
        config_str(&self.config, "project", "demo")
    }
}

impl Backend for PerforceSwarmReviewBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn connect(&mut self) -> Result<(), CommandError> {
        seed_default(&mut self.config, "host", "https://swarm.example.com");
        seed_default(&mut self.config, "project", "demo");
        if self.ticket.is_none() {
            self.ticket = Some(format!("swarm-{}-{}", self.project(), std::process::id()));
        }
        self.connected = true;
        Ok(())
    }

    fn session_state(&mut self) -> Option<&mut dyn SessionState> {
        Some(self)
    }
}

impl SessionState for PerforceSwarmReviewBackend {
    fn restore(&mut self, blob: &SessionBlob) {
        if let Some(ticket) = blob.get("ticket") {
            self.ticket = Some(ticket.clone());
        }
    }

    fn export(&self) -> SessionBlob {
        let mut blob = SessionBlob::new();
        if let Some(ticket) = &self.ticket {
            blob.insert("ticket".to_string(), ticket.clone());
        }
        blob
    }
}

impl ReviewBackend for PerforceSwarmReviewBackend {
    fn create_review(&mut self, subject: &str) -> Result<String, CommandError> {
        self.ensure_connected()?;
        Ok(format!(
            "swarm create review in project {} with subject: {subject}",
            self.project()
        ))
    }

    fn comment(&mut self, body: &str) -> Result<String, CommandError> {
        self.ensure_connected()?;
        Ok(format!("swarm comment: {body}"))
    }

    fn approve(&mut self, message: &str) -> Result<String, CommandError> {
        self.ensure_connected()?;
        Ok(format!("swarm approve review with message: {message}"))
    }
}
