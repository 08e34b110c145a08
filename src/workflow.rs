//! Workflow engine
//!
//! Sequences a named list of domain command invocations against one shared
//! context, applying the continue/stop-on-error policy and aggregating
//! per-step telemetry and failures. Steps run strictly in order; the only
//! interruption point is between steps.

use crate::config::BosunConfig;
use crate::context::ContextState;
use crate::error::CommandError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// A single workflow step as written in configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WorkflowStep {
    /// Command line tokenized on whitespace; no shell expansion
    Raw(String),

    /// Explicit token sequence, used verbatim
    Tokens(Vec<String>),
}

impl WorkflowStep {
    /// Canonical token sequence for dispatch.
    pub fn resolve(&self) -> Vec<String> {
        match self {
            WorkflowStep::Raw(line) => {
                line.split_whitespace().map(str::to_string).collect()
            }
            WorkflowStep::Tokens(tokens) => tokens.clone(),
        }
    }
}

/// Named, ordered sequence of steps, immutable once loaded
#[derive(Debug, Clone)]
pub struct WorkflowDefinition {
    pub name: String,
    pub steps: Vec<WorkflowStep>,
}

impl WorkflowDefinition {
    pub fn from_config(config: &BosunConfig, name: &str) -> Result<Self, CommandError> {
        let steps = config.workflow_steps(name)?;
        Ok(Self {
            name: name.to_string(),
            steps: steps.to_vec(),
        })
    }
}

/// Lifecycle of one workflow run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Pending,
    Running,
    Completed,
    CompletedWithFailures,
    Aborted,
}

impl WorkflowState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowState::Pending => "pending",
            WorkflowState::Running => "running",
            WorkflowState::Completed => "completed",
            WorkflowState::CompletedWithFailures => "completed-with-failures",
            WorkflowState::Aborted => "aborted",
        }
    }
}

/// One attempted step with its outcome
#[derive(Debug, Clone)]
pub struct StepRecord {
    /// 1-based position in the definition
    pub index: usize,
    pub tokens: Vec<String>,
    /// Displayable output, when the step produced one
    pub output: Option<String>,
    pub error: Option<String>,
}

impl StepRecord {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// One failed step, kept in run order
#[derive(Debug, Clone)]
pub struct StepFailure {
    pub index: usize,
    pub tokens: Vec<String>,
    pub error: String,
}

/// Final result of one workflow run
#[derive(Debug, Clone)]
pub struct WorkflowReport {
    pub name: String,
    pub state: WorkflowState,
    pub attempted: Vec<StepRecord>,
    pub failures: Vec<StepFailure>,
    pub elapsed: Duration,
}

/// In-flight run marker stored on the context
#[derive(Debug, Clone)]
pub struct WorkflowProgress {
    pub name: String,
    pub state: WorkflowState,
    pub current_step: usize,
    pub total_steps: usize,
}

pub struct WorkflowEngine;

impl WorkflowEngine {
    /// Run `definition` against the shared context.
    ///
    /// Each step is dispatched through `invoke` inside a telemetry span
    /// labeled with the step's command path. With `continue_on_error` the
    /// run attempts every step and ends `CompletedWithFailures` when any
    /// failed; without it the first failure aborts the run and later steps
    /// are never attempted.
    pub fn run<F>(
        ctx: &mut ContextState,
        definition: &WorkflowDefinition,
        continue_on_error: bool,
        mut invoke: F,
    ) -> WorkflowReport
    where
        F: FnMut(&mut ContextState, &[String]) -> Result<Option<String>, CommandError>,
    {
        let start = Instant::now();
        let total_steps = definition.steps.len();

        ctx.workflow_state = Some(WorkflowProgress {
            name: definition.name.clone(),
            state: WorkflowState::Running,
            current_step: 0,
            total_steps,
        });
        info!(
            workflow = %definition.name,
            steps = total_steps,
            continue_on_error,
            "Workflow started"
        );

        let mut attempted: Vec<StepRecord> = Vec::new();
        let mut failures: Vec<StepFailure> = Vec::new();
        let mut aborted = false;

        for (position, step) in definition.steps.iter().enumerate() {
            let index = position + 1;
            let tokens = step.resolve();
            if tokens.is_empty() {
                continue;
            }

            if let Some(progress) = ctx.workflow_state.as_mut() {
                progress.current_step = index;
            }

            let telemetry = Arc::clone(&ctx.telemetry);
            let span_name = format!("workflow.step.{}", command_path(&tokens));
            let result = telemetry.track(&span_name, || invoke(ctx, &tokens));

            match result {
                Ok(output) => {
                    attempted.push(StepRecord {
                        index,
                        tokens,
                        output,
                        error: None,
                    });
                }
                Err(error) => {
                    let message = error.to_string();
                    warn!(
                        workflow = %definition.name,
                        step = index,
                        command = %tokens.join(" "),
                        error = %message,
                        "Workflow step failed"
                    );
                    attempted.push(StepRecord {
                        index,
                        tokens: tokens.clone(),
                        output: None,
                        error: Some(message.clone()),
                    });
                    failures.push(StepFailure {
                        index,
                        tokens,
                        error: message,
                    });
                    if !continue_on_error {
                        aborted = true;
                        break;
                    }
                }
            }
        }

        let state = if aborted {
            WorkflowState::Aborted
        } else if failures.is_empty() {
            WorkflowState::Completed
        } else {
            WorkflowState::CompletedWithFailures
        };

        if let Some(progress) = ctx.workflow_state.as_mut() {
            progress.state = state;
        }

        let elapsed = start.elapsed();
        info!(
            workflow = %definition.name,
            state = state.as_str(),
            attempted = attempted.len(),
            failed = failures.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Workflow finished"
        );

        WorkflowReport {
            name: definition.name.clone(),
            state,
            attempted,
            failures,
            elapsed,
        }
    }
}

/// Command path of a step: leading tokens up to the first flag, dotted.
fn command_path(tokens: &[String]) -> String {
    let path: Vec<&str> = tokens
        .iter()
        .take_while(|token| !token.starts_with('-'))
        .map(String::as_str)
        .collect();
    if path.is_empty() {
        tokens.join(".")
    } else {
        path.join(".")
    }
}
