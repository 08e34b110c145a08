//! Global config file source: ~/.config/bosun/config.toml or $XDG_CONFIG_HOME/bosun/config.toml

use config::builder::DefaultState;
use config::{ConfigBuilder, File};
use std::path::PathBuf;
use tracing::debug;

/// Path to the per-user global config file.
pub fn global_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "bosun")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Add the global config file source to the builder when it exists.
pub fn add_global_file(mut builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    if let Some(global_path) = global_config_path() {
        if global_path.exists() {
            builder = builder.add_source(File::from(global_path).required(false));
        } else {
            debug!(
                config_path = %global_path.display(),
                "No global configuration file; using defaults"
            );
        }
    }
    builder
}
