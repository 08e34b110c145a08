//! Integration tests for workflow execution through the CLI dispatch table.

use bosun::backend::BackendRegistry;
use bosun::cli::{self, Cli, Commands};
use bosun::context::ContextState;
use bosun::config::ConfigLoader;
use bosun::error::CommandError;
use bosun::telemetry::TelemetryOutcome;
use clap::Parser;
use tempfile::TempDir;

fn context_from(dir: &TempDir, config_body: &str) -> ContextState {
    let config_file = dir.path().join("config.toml");
    let sessions = dir.path().join("sessions.toml");
    let body = format!(
        "{config_body}\n[cache]\nsessions_path = \"{}\"\n",
        sessions.display()
    );
    std::fs::write(&config_file, body).unwrap();
    let config = ConfigLoader::load_from_file(&config_file).unwrap();
    ContextState::new(config, "local", BackendRegistry::builtin()).unwrap()
}

fn parse_command(argv: &[&str]) -> Commands {
    let mut full = vec!["bosun"];
    full.extend(argv);
    Cli::parse_from(full).command
}

const DEMO_CONFIG: &str = r#"
[backends]
scm = "git"
analysis = "sonarqube"
review = "perforce-swarm"

[backend_configs.git]
repo = "https://example.com/app.git"

[workflows]
ship = ["scm sync", "scm status", ["scm", "submit", "--message", "release build"], "analysis scan"]
mixed = ["scm sync", "deploy now", "analysis scan"]
"#;

#[test]
fn test_workflow_run_executes_all_steps() {
    let dir = TempDir::new().unwrap();
    let mut ctx = context_from(&dir, DEMO_CONFIG);

    let command = parse_command(&["workflow", "run", "ship"]);
    let output = cli::execute(&mut ctx, &command).unwrap().unwrap();

    assert!(output.contains("Workflow 'ship' completed"));
    assert!(output.contains("4 step(s) attempted, 0 failed"));
    // the explicit token form kept the two-word message intact
    assert!(output.contains("release build"));
}

#[test]
fn test_workflow_steps_share_one_backend_session() {
    let dir = TempDir::new().unwrap();
    let mut ctx = context_from(&dir, DEMO_CONFIG);

    let command = parse_command(&["workflow", "run", "ship"]);
    cli::execute(&mut ctx, &command).unwrap();

    assert!(ctx.sessions.contains("scm"));
    assert!(ctx.sessions.contains("analysis"));
    assert!(!ctx.sessions.contains("review"));
}

#[test]
fn test_workflow_telemetry_one_record_per_step_plus_top_level() {
    let dir = TempDir::new().unwrap();
    let mut ctx = context_from(&dir, DEMO_CONFIG);

    let command = parse_command(&["workflow", "run", "ship"]);
    cli::execute(&mut ctx, &command).unwrap();

    let events = ctx.telemetry.events();
    assert_eq!(events.len(), 5);
    assert_eq!(events[0].name, "workflow.step.scm.sync");
    assert_eq!(events[4].name, "workflow.run.ship");
    assert!(events
        .iter()
        .all(|e| e.outcome == TelemetryOutcome::Success));
}

#[test]
fn test_workflow_continue_on_error_reports_failed_indices() {
    let dir = TempDir::new().unwrap();
    let mut ctx = context_from(&dir, DEMO_CONFIG);

    let command = parse_command(&["workflow", "run", "mixed", "--continue-on-error"]);
    let err = cli::execute(&mut ctx, &command).unwrap_err();

    match err {
        CommandError::WorkflowFailed { name, failed } => {
            assert_eq!(name, "mixed");
            assert_eq!(failed, 1);
        }
        other => panic!("Expected WorkflowFailed, got {other:?}"),
    }

    // all three steps attempted: spans for each, plus the top-level record
    assert_eq!(ctx.telemetry.len(), 4);
}

#[test]
fn test_workflow_stop_on_error_never_reaches_later_steps() {
    let dir = TempDir::new().unwrap();
    let mut ctx = context_from(&dir, DEMO_CONFIG);

    let command = parse_command(&["workflow", "run", "mixed"]);
    cli::execute(&mut ctx, &command).unwrap_err();

    // sync span + failed step span + top-level record; analysis never ran
    assert_eq!(ctx.telemetry.len(), 3);
    assert!(!ctx.sessions.contains("analysis"));
}

#[test]
fn test_workflow_json_report() {
    let dir = TempDir::new().unwrap();
    let mut ctx = context_from(&dir, DEMO_CONFIG);

    let command = parse_command(&["workflow", "run", "ship", "--format", "json"]);
    let output = cli::execute(&mut ctx, &command).unwrap().unwrap();

    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["state"], "completed");
    assert_eq!(value["attempted"].as_array().unwrap().len(), 4);
    assert!(value["failures"].as_array().unwrap().is_empty());
}

#[test]
fn test_domain_command_end_to_end() {
    let dir = TempDir::new().unwrap();
    let mut ctx = context_from(&dir, DEMO_CONFIG);

    let command = parse_command(&["scm", "sync"]);
    let output = cli::execute(&mut ctx, &command).unwrap().unwrap();
    assert_eq!(output, "git pull https://example.com/app.git main");
}

#[test]
fn test_environment_overlay_reaches_backend() {
    let dir = TempDir::new().unwrap();
    let config_file = dir.path().join("config.toml");
    std::fs::write(
        &config_file,
        r#"
[backends]
scm = "git"

[backend_configs.git]
repo = "https://example.com/app.git"

[envs.docker.backend_configs.git]
repo = "https://mirror.example.com/app.git"
"#,
    )
    .unwrap();
    let config = ConfigLoader::load_from_file(&config_file).unwrap();
    let mut ctx = ContextState::new(config, "docker", BackendRegistry::builtin()).unwrap();

    let command = parse_command(&["scm", "sync"]);
    let output = cli::execute(&mut ctx, &command).unwrap().unwrap();
    assert_eq!(output, "git pull https://mirror.example.com/app.git main");
}
