mod runner_selection;
mod session_persistence;
mod workflow_commands;
