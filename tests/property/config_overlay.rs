//! Property tests for the environment backend-config overlay.

use bosun::config::{BosunConfig, EnvConfig};
use proptest::prelude::*;

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_-]{1,16}"
}

proptest! {
    /// Environment-specific keys win; base-only keys survive the overlay.
    #[test]
    fn overlay_is_override_wins(
        base_token in value_strategy(),
        override_token in value_strategy(),
        base_only in value_strategy(),
    ) {
        let mut base = toml::Table::new();
        base.insert("token".to_string(), toml::Value::String(base_token.clone()));
        base.insert("repo".to_string(), toml::Value::String(base_only.clone()));

        let mut overrides = toml::Table::new();
        overrides.insert(
            "token".to_string(),
            toml::Value::String(override_token.clone()),
        );

        let mut env_config = EnvConfig::default();
        env_config
            .backend_configs
            .insert("git".to_string(), overrides);

        let mut config = BosunConfig::default();
        config.backend_configs.insert("git".to_string(), base);
        config.envs.insert("docker".to_string(), env_config);

        let merged = config.merged_backend_config("git", "docker");
        prop_assert_eq!(merged["token"].as_str(), Some(override_token.as_str()));
        prop_assert_eq!(merged["repo"].as_str(), Some(base_only.as_str()));

        // environments without an overlay read the base value untouched
        let plain = config.merged_backend_config("git", "local");
        prop_assert_eq!(plain["token"].as_str(), Some(base_token.as_str()));
    }
}
