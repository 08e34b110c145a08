//! CLI domain: parse, route, and output only.
//! No domain orchestration; a single route table dispatches to domain sessions.

mod output;
mod parse;
mod route;

pub use output::{map_error, render_telemetry, render_workflow_report};
pub use parse::{
    AnalysisCommands, Cli, Commands, ReviewCommands, ScmCommands, StepCli, WorkflowCommands,
};
pub use route::{command_name, execute};
