//! Demo Bitbucket review backend.
//!
//! Keeps an auth token as reusable session state: a token restored from the
//! session store is reused, otherwise connect mints a fresh one.

use crate::backend::demo::{config_str, seed_default};
use crate::backend::{Backend, BackendInit, ReviewBackend, SessionBlob, SessionState};
use crate::error::CommandError;

pub struct BitbucketReviewBackend {
    name: String,
    config: toml::Table,
    connected: bool,
    token: Option<String>,
}

impl BitbucketReviewBackend {
    pub fn new(init: BackendInit) -> Self {
        Self {
            name: init.name,
            config: init.config,
            connected: false,
            token: None,
        }
    }

    fn ensure_connected(&mut self) -> Result<(), CommandError> {
        if !self.connected {
            self.connect()?;
        }
        Ok(())
    }

    fn project_key(&self) -> String {
        config_str(&self.config, "project_key", "DEMO")
    }
}

impl Backend for BitbucketReviewBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn connect(&mut self) -> Result<(), CommandError> {
        seed_default(&mut self.config, "host", "https://bitbucket.example.com");
        seed_default(&mut self.config, "project_key", "DEMO");
        if self.token.is_none() {
            self.token = Some(format!(
                "bb-{}-{}",
                self.project_key().to_lowercase(),
                std::process::id()
            ));
        }
        self.connected = true;
        Ok(())
    }

    fn session_state(&mut self) -> Option<&mut dyn SessionState> {
        Some(self)
    }
}

impl SessionState for BitbucketReviewBackend {
    fn restore(&mut self, blob: &SessionBlob) {
        if let Some(token) = blob.get("token") {
            self.token = Some(token.clone());
        }
    }

    fn export(&self) -> SessionBlob {
        let mut blob = SessionBlob::new();
        if let Some(token) = &self.token {
            blob.insert("token".to_string(), token.clone());
        }
        blob
    }
}

impl ReviewBackend for BitbucketReviewBackend {
    fn create_review(&mut self, subject: &str) -> Result<String, CommandError> {
        self.ensure_connected()?;
        Ok(format!(
            "bitbucket create PR in {} with subject: {subject}",
            self.project_key()
        ))
    }

    fn comment(&mut self, body: &str) -> Result<String, CommandError> {
        self.ensure_connected()?;
        Ok(format!("bitbucket comment on PR: {body}"))
    }

    fn approve(&mut self, message: &str) -> Result<String, CommandError> {
        self.ensure_connected()?;
        Ok(format!("bitbucket approve PR with message: {message}"))
    }
}
