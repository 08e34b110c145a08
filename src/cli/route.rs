//! CLI route: single dispatch table from parsed commands to domain sessions.

use crate::cli::output::render_workflow_report;
use crate::cli::parse::{
    AnalysisCommands, Commands, ReviewCommands, ScmCommands, StepCli, WorkflowCommands,
};
use crate::context::ContextState;
use crate::error::CommandError;
use crate::workflow::{WorkflowDefinition, WorkflowEngine};
use clap::Parser;
use std::sync::Arc;

/// Execute one parsed command against the shared context.
///
/// Every invocation records exactly one top-level telemetry event named
/// after the command path; workflow steps add their own span each.
pub fn execute(ctx: &mut ContextState, command: &Commands) -> Result<Option<String>, CommandError> {
    let telemetry = Arc::clone(&ctx.telemetry);
    telemetry.track(&command_name(command), || dispatch(ctx, command))
}

/// Dotted telemetry name for a command.
pub fn command_name(command: &Commands) -> String {
    match command {
        Commands::Scm { command } => match command {
            ScmCommands::Sync => "scm.sync".to_string(),
            ScmCommands::Status => "scm.status".to_string(),
            ScmCommands::Submit { .. } => "scm.submit".to_string(),
        },
        Commands::Analysis { command } => match command {
            AnalysisCommands::Scan => "analysis.scan".to_string(),
            AnalysisCommands::Report { .. } => "analysis.report".to_string(),
        },
        Commands::Review { command } => match command {
            ReviewCommands::Create { .. } => "review.create".to_string(),
            ReviewCommands::Comment { .. } => "review.comment".to_string(),
            ReviewCommands::Approve { .. } => "review.approve".to_string(),
        },
        Commands::Workflow {
            command: WorkflowCommands::Run { name, .. },
        } => format!("workflow.run.{name}"),
    }
}

fn dispatch(ctx: &mut ContextState, command: &Commands) -> Result<Option<String>, CommandError> {
    match command {
        Commands::Scm { command } => {
            let backend = ctx.session("scm")?.as_scm()?;
            let output = match command {
                ScmCommands::Sync => backend.sync()?,
                ScmCommands::Status => backend.status()?,
                ScmCommands::Submit { message } => backend.submit(message)?,
            };
            Ok(Some(output))
        }
        Commands::Analysis { command } => {
            let backend = ctx.session("analysis")?.as_analysis()?;
            let output = match command {
                AnalysisCommands::Scan => backend.scan()?,
                AnalysisCommands::Report { format } => backend.report(format)?,
            };
            Ok(Some(output))
        }
        Commands::Review { command } => {
            let backend = ctx.session("review")?.as_review()?;
            let output = match command {
                ReviewCommands::Create { subject } => backend.create_review(subject)?,
                ReviewCommands::Comment { body } => backend.comment(body)?,
                ReviewCommands::Approve { message } => backend.approve(message)?,
            };
            Ok(Some(output))
        }
        Commands::Workflow {
            command:
                WorkflowCommands::Run {
                    name,
                    continue_on_error,
                    format,
                },
        } => {
            let definition = WorkflowDefinition::from_config(&ctx.config, name)?;
            let report =
                WorkflowEngine::run(ctx, &definition, *continue_on_error, invoke_step);
            let rendered = render_workflow_report(&report, format)?;

            if report.failures.is_empty() {
                Ok(Some(rendered))
            } else {
                // surface the report before the run is reported as failed
                println!("{rendered}");
                Err(CommandError::WorkflowFailed {
                    name: name.clone(),
                    failed: report.failures.len(),
                })
            }
        }
    }
}

/// Invoke one workflow step by re-entering the command table.
fn invoke_step(ctx: &mut ContextState, tokens: &[String]) -> Result<Option<String>, CommandError> {
    let command = parse_step(tokens)?;
    dispatch(ctx, &command)
}

fn parse_step(tokens: &[String]) -> Result<Commands, CommandError> {
    StepCli::try_parse_from(tokens)
        .map(|step| step.command)
        .map_err(|error| {
            CommandError::UnknownCommand(format!("{} ({})", tokens.join(" "), error.kind()))
        })
}
