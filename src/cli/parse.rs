//! CLI parse: clap types for bosun. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Bosun CLI - uniform commands over pluggable backends
#[derive(Parser)]
#[command(name = "bosun")]
#[command(about = "Uniform command surface over pluggable build, analysis, and review backends")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Execution environment
    #[arg(long, global = true, default_value = "local")]
    pub env: String,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(long, global = true)]
    pub quiet: bool,
}

/// Shim for parsing workflow step token vectors through the same table
#[derive(Parser)]
#[command(name = "step", no_binary_name = true)]
pub struct StepCli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Source control commands
    Scm {
        #[command(subcommand)]
        command: ScmCommands,
    },
    /// Analysis commands
    Analysis {
        #[command(subcommand)]
        command: AnalysisCommands,
    },
    /// Review commands
    Review {
        #[command(subcommand)]
        command: ReviewCommands,
    },
    /// Workflow automation
    Workflow {
        #[command(subcommand)]
        command: WorkflowCommands,
    },
}

#[derive(Subcommand)]
pub enum ScmCommands {
    /// Synchronize the working tree
    Sync,
    /// Show working tree status
    Status,
    /// Submit pending changes
    Submit {
        /// Submission message
        #[arg(long, default_value = "")]
        message: String,
    },
}

#[derive(Subcommand)]
pub enum AnalysisCommands {
    /// Run an analysis scan
    Scan,
    /// Produce an analysis report
    Report {
        /// Output format for the analysis report
        #[arg(long, default_value = "text")]
        format: String,
    },
}

#[derive(Subcommand)]
pub enum ReviewCommands {
    /// Create a review request
    Create {
        /// Review subject
        #[arg(long, default_value = "")]
        subject: String,
    },
    /// Comment on a review
    Comment {
        /// Comment body
        #[arg(long, default_value = "")]
        body: String,
    },
    /// Approve a review
    Approve {
        /// Approval message
        #[arg(long, default_value = "")]
        message: String,
    },
}

#[derive(Subcommand)]
pub enum WorkflowCommands {
    /// Run a named workflow from configuration
    Run {
        /// Workflow name
        name: String,

        /// Continue executing remaining steps even if a step fails
        #[arg(long)]
        continue_on_error: bool,

        /// Report format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}
