//! CLI output: presentation and error mapping.

use crate::error::CommandError;
use crate::telemetry::{TelemetryEvent, TelemetryOutcome};
use crate::workflow::{WorkflowReport, WorkflowState};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::json;

/// User-facing rendering of a command error.
pub fn map_error(error: &CommandError) -> String {
    format!("{} {error}", "Error:".red())
}

/// Render a workflow report in the requested format.
pub fn render_workflow_report(
    report: &WorkflowReport,
    format: &str,
) -> Result<String, CommandError> {
    match format {
        "text" => Ok(render_workflow_text(report)),
        "json" => render_workflow_json(report),
        other => Err(CommandError::Configuration(format!(
            "Invalid report format: {other} (must be 'text' or 'json')"
        ))),
    }
}

fn render_workflow_text(report: &WorkflowReport) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["#", "step", "outcome", "detail"]);

    for record in &report.attempted {
        let outcome = if record.succeeded() {
            "ok".green().to_string()
        } else {
            "failed".red().to_string()
        };
        let detail = record
            .error
            .clone()
            .or_else(|| record.output.clone())
            .unwrap_or_default();
        table.add_row(vec![
            record.index.to_string(),
            record.tokens.join(" "),
            outcome,
            detail,
        ]);
    }

    format!(
        "Workflow '{}' {} in {:.2?}: {} step(s) attempted, {} failed\n{table}",
        report.name,
        report.state.as_str(),
        report.elapsed,
        report.attempted.len(),
        report.failures.len(),
    )
}

fn render_workflow_json(report: &WorkflowReport) -> Result<String, CommandError> {
    let value = json!({
        "name": report.name,
        "state": report.state.as_str(),
        "elapsed_ms": report.elapsed.as_millis() as u64,
        "attempted": report
            .attempted
            .iter()
            .map(|record| {
                json!({
                    "index": record.index,
                    "command": record.tokens.join(" "),
                    "succeeded": record.succeeded(),
                    "output": record.output,
                    "error": record.error,
                })
            })
            .collect::<Vec<_>>(),
        "failures": report
            .failures
            .iter()
            .map(|failure| {
                json!({
                    "index": failure.index,
                    "command": failure.tokens.join(" "),
                    "error": failure.error,
                })
            })
            .collect::<Vec<_>>(),
    });

    serde_json::to_string_pretty(&value)
        .map_err(|e| CommandError::Backend(format!("Failed to render report: {e}")))
}

/// Render the telemetry log as a table (verbose mode).
pub fn render_telemetry(events: &[TelemetryEvent]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["operation", "outcome", "duration", "error"]);

    for event in events {
        let outcome = match event.outcome {
            TelemetryOutcome::Success => event.outcome.as_str().green().to_string(),
            TelemetryOutcome::Failure => event.outcome.as_str().red().to_string(),
        };
        table.add_row(vec![
            event.name.clone(),
            outcome,
            format!("{:.2?}", event.duration),
            event.error.clone().unwrap_or_default(),
        ]);
    }

    format!("Telemetry ({} event(s)):\n{table}", events.len())
}
