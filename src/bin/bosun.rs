//! Bosun CLI Binary
//!
//! Command-line entry point: load configuration, initialize logging, build
//! the invocation context, dispatch, and tear down.

use bosun::backend::BackendRegistry;
use bosun::cli::{self, Cli};
use bosun::config::ConfigLoader;
use bosun::context::ContextState;
use bosun::logging::init_logging;
use clap::Parser;
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    let config = match ConfigLoader::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", cli::map_error(&e));
            process::exit(1);
        }
    };

    if let Err(e) = init_logging(&config.logging, cli.verbose, cli.quiet) {
        eprintln!("Failed to initialize logging: {e}");
        process::exit(1);
    }

    info!(env = %cli.env, "Bosun starting");

    let mut ctx = match ContextState::new(config, &cli.env, BackendRegistry::builtin()) {
        Ok(ctx) => ctx.with_verbosity(cli.verbose, cli.quiet),
        Err(e) => {
            error!(error = %e, "Failed to initialize context");
            eprintln!("{}", cli::map_error(&e));
            process::exit(1);
        }
    };

    let result = cli::execute(&mut ctx, &cli.command);

    if ctx.verbose && !ctx.telemetry.is_empty() {
        eprintln!("{}", cli::render_telemetry(&ctx.telemetry.events()));
    }

    // persist reusable session state before reporting the outcome
    ctx.finish();

    match result {
        Ok(Some(output)) => println!("{output}"),
        Ok(None) => {}
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("{}", cli::map_error(&e));
            process::exit(1);
        }
    }
}
