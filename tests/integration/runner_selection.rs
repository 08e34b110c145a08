//! Integration tests for runner selection from configuration.

use bosun::config::ConfigLoader;
use bosun::error::CommandError;
use bosun::runner::select_runner;
use tempfile::TempDir;

fn load(config_body: &str) -> bosun::config::BosunConfig {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, config_body).unwrap();
    ConfigLoader::load_from_file(&path).unwrap()
}

#[test]
fn test_absent_runner_config_means_local() {
    let config = load(
        r#"
[envs.docker.backend_configs.git]
token = "B"
"#,
    );

    // even an environment named "docker" runs locally without a runner block
    let runner = select_runner("docker", &config).unwrap();
    assert_eq!(runner.label(), "local");

    let runner = select_runner("never-mentioned", &config).unwrap();
    assert_eq!(runner.label(), "local");
}

#[test]
fn test_docker_runner_bound_to_container() {
    let config = load(
        r#"
[envs.docker.runner]
type = "docker"
container = "builder"
docker_bin = "podman"
"#,
    );

    let runner = select_runner("docker", &config).unwrap();
    assert_eq!(runner.label(), "docker:builder");
}

#[test]
fn test_k8s_runner_bound_to_namespace_and_pod() {
    let config = load(
        r#"
[envs.prod.runner]
type = "k8s"
pod = "api"
namespace = "demo"
"#,
    );

    let runner = select_runner("prod", &config).unwrap();
    assert_eq!(runner.label(), "k8s:demo/api");
}

#[test]
fn test_unsupported_type_is_configuration_error() {
    let config = load(
        r#"
[envs.cloud.runner]
type = "fargate"
"#,
    );

    let err = select_runner("cloud", &config).unwrap_err();
    assert!(matches!(err, CommandError::Configuration(_)));
    assert!(err.to_string().contains("fargate"));
}

#[test]
fn test_runner_block_without_type_defaults_to_local() {
    let config = load(
        r#"
[envs.sandbox.runner]
cwd = "/tmp"
"#,
    );

    let runner = select_runner("sandbox", &config).unwrap();
    assert_eq!(runner.label(), "local");
}
