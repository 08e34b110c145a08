//! Execution environments
//!
//! A `Runner` executes a fully tokenized command in a target environment:
//! the local host, a running container, or a cluster pod. Callers supply
//! argument vectors; runners never perform shell expansion.

use crate::config::BosunConfig;
use crate::error::{CommandError, RunnerError};
use std::path::PathBuf;
use std::process::Command;

/// Outcome of one command execution
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub exit_code: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Per-call execution options
#[derive(Debug, Clone, Default)]
pub struct ExecOptions {
    /// Extra environment variables for the spawned client process
    pub env: Vec<(String, String)>,

    /// Working directory override
    pub cwd: Option<PathBuf>,
}

/// Interface for executing commands in different environments.
///
/// `execute` blocks until the command terminates; no timeout is enforced at
/// this layer.
pub trait Runner: Send + Sync {
    /// Environment name this runner serves.
    fn env(&self) -> &str;

    /// Short label for logs: runner type plus its target.
    fn label(&self) -> String;

    /// Execute a tokenized command and wait for it to finish.
    fn execute(&self, argv: &[String], options: &ExecOptions)
        -> Result<ExecutionResult, RunnerError>;

    /// Execute with default options.
    fn run(&self, argv: &[String]) -> Result<ExecutionResult, RunnerError> {
        self.execute(argv, &ExecOptions::default())
    }
}

impl std::fmt::Debug for dyn Runner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner")
            .field("env", &self.env())
            .field("label", &self.label())
            .finish()
    }
}

/// Run commands directly on the host
pub struct LocalRunner {
    env: String,
    cwd: Option<PathBuf>,
}

impl LocalRunner {
    pub fn new(env: impl Into<String>) -> Self {
        Self {
            env: env.into(),
            cwd: None,
        }
    }

    pub fn with_cwd(env: impl Into<String>, cwd: Option<PathBuf>) -> Self {
        Self {
            env: env.into(),
            cwd,
        }
    }
}

impl Runner for LocalRunner {
    fn env(&self) -> &str {
        &self.env
    }

    fn label(&self) -> String {
        "local".to_string()
    }

    fn execute(
        &self,
        argv: &[String],
        options: &ExecOptions,
    ) -> Result<ExecutionResult, RunnerError> {
        let (program, args) = split_argv(argv)?;
        let mut command = Command::new(program);
        command.args(args);
        if let Some(cwd) = options.cwd.as_ref().or(self.cwd.as_ref()) {
            command.current_dir(cwd);
        }
        run_blocking(command, program, options)
    }
}

/// Run commands inside a Docker container using `docker exec`
pub struct DockerRunner {
    env: String,
    container: String,
    docker_bin: String,
}

impl DockerRunner {
    pub fn new(env: impl Into<String>, container: impl Into<String>) -> Self {
        Self {
            env: env.into(),
            container: container.into(),
            docker_bin: "docker".to_string(),
        }
    }

    pub fn with_docker_bin(mut self, docker_bin: impl Into<String>) -> Self {
        self.docker_bin = docker_bin.into();
        self
    }

    fn wrapped_argv(&self, argv: &[String]) -> Vec<String> {
        let mut full = vec![
            self.docker_bin.clone(),
            "exec".to_string(),
            self.container.clone(),
        ];
        full.extend(argv.iter().cloned());
        full
    }
}

impl Runner for DockerRunner {
    fn env(&self) -> &str {
        &self.env
    }

    fn label(&self) -> String {
        format!("docker:{}", self.container)
    }

    fn execute(
        &self,
        argv: &[String],
        options: &ExecOptions,
    ) -> Result<ExecutionResult, RunnerError> {
        if argv.is_empty() {
            return Err(RunnerError::EmptyCommand);
        }
        let full = self.wrapped_argv(argv);
        let (program, args) = split_argv(&full)?;
        let mut command = Command::new(program);
        command.args(args);
        run_blocking(command, program, options)
    }
}

/// Run commands inside a Kubernetes pod using `kubectl exec`
pub struct K8sRunner {
    env: String,
    pod: String,
    namespace: Option<String>,
    kubectl_bin: String,
}

impl K8sRunner {
    pub fn new(
        env: impl Into<String>,
        pod: impl Into<String>,
        namespace: Option<String>,
    ) -> Self {
        Self {
            env: env.into(),
            pod: pod.into(),
            namespace,
            kubectl_bin: "kubectl".to_string(),
        }
    }

    pub fn with_kubectl_bin(mut self, kubectl_bin: impl Into<String>) -> Self {
        self.kubectl_bin = kubectl_bin.into();
        self
    }

    fn wrapped_argv(&self, argv: &[String]) -> Vec<String> {
        let mut full = vec![self.kubectl_bin.clone()];
        if let Some(namespace) = &self.namespace {
            full.push("-n".to_string());
            full.push(namespace.clone());
        }
        full.push("exec".to_string());
        full.push(self.pod.clone());
        full.push("--".to_string());
        full.extend(argv.iter().cloned());
        full
    }
}

impl Runner for K8sRunner {
    fn env(&self) -> &str {
        &self.env
    }

    fn label(&self) -> String {
        match &self.namespace {
            Some(namespace) => format!("k8s:{}/{}", namespace, self.pod),
            None => format!("k8s:{}", self.pod),
        }
    }

    fn execute(
        &self,
        argv: &[String],
        options: &ExecOptions,
    ) -> Result<ExecutionResult, RunnerError> {
        if argv.is_empty() {
            return Err(RunnerError::EmptyCommand);
        }
        let full = self.wrapped_argv(argv);
        let (program, args) = split_argv(&full)?;
        let mut command = Command::new(program);
        command.args(args);
        run_blocking(command, program, options)
    }
}

fn split_argv(argv: &[String]) -> Result<(&String, &[String]), RunnerError> {
    argv.split_first().ok_or(RunnerError::EmptyCommand)
}

fn run_blocking(
    mut command: Command,
    program: &str,
    options: &ExecOptions,
) -> Result<ExecutionResult, RunnerError> {
    for (key, value) in &options.env {
        command.env(key, value);
    }

    let output = command.output().map_err(|source| RunnerError::Spawn {
        program: program.to_string(),
        source,
    })?;

    Ok(ExecutionResult {
        // signal-terminated processes carry no exit code
        exit_code: output.status.code().unwrap_or(-1),
        stdout: output.stdout,
        stderr: output.stderr,
    })
}

/// Instantiate a runner for the requested environment.
///
/// Pure construction: no connection is opened until `execute` is called.
/// Environments without an explicit `runner` block run locally.
pub fn select_runner(env: &str, config: &BosunConfig) -> Result<Box<dyn Runner>, CommandError> {
    let runner_config = config.envs.get(env).and_then(|e| e.runner.as_ref());

    let Some(runner_config) = runner_config else {
        return Ok(Box::new(LocalRunner::new(env)));
    };

    match runner_config.runner_type.as_str() {
        "local" => Ok(Box::new(LocalRunner::with_cwd(
            env,
            runner_config.cwd.clone(),
        ))),
        "docker" => {
            let container = runner_config.container.clone().ok_or_else(|| {
                CommandError::Configuration(format!(
                    "Docker runner for environment '{env}' requires 'container'"
                ))
            })?;
            Ok(Box::new(
                DockerRunner::new(env, container)
                    .with_docker_bin(runner_config.docker_bin.clone()),
            ))
        }
        "k8s" | "kubernetes" => {
            let pod = runner_config.pod.clone().ok_or_else(|| {
                CommandError::Configuration(format!(
                    "K8s runner for environment '{env}' requires 'pod'"
                ))
            })?;
            Ok(Box::new(
                K8sRunner::new(env, pod, runner_config.namespace.clone())
                    .with_kubectl_bin(runner_config.kubectl_bin.clone()),
            ))
        }
        other => Err(CommandError::Configuration(format!(
            "Unknown runner type '{other}' for environment '{env}'"
        ))),
    }
}
