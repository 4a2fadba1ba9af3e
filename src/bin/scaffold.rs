//! Scaffold CLI Binary
//!
//! Materializes stored project specifications as directory trees or
//! repositories.

use clap::Parser;
use scaffold::logging::init_logging;
use scaffold::tooling::cli::{error_json, Cli, CliContext, OutputFormat};
use std::process;

/// Exit status when a publish finished but some paths were not created.
const INCOMPLETE_EXIT_CODE: i32 = 2;

fn main() {
    let cli = Cli::parse();
    let json_errors = cli.command.format() == OutputFormat::Json;

    let context = match CliContext::new(cli.workspace.clone(), cli.config.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            report(&e, json_errors, "Error initializing workspace");
            process::exit(1);
        }
    };

    let logging = cli.logging_config(&context.config().logging);
    if let Err(e) = init_logging(Some(&logging)) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    match context.run(&cli.command) {
        Ok(outcome) => {
            println!("{}", outcome.output);
            if !outcome.complete {
                process::exit(INCOMPLETE_EXIT_CODE);
            }
        }
        Err(e) => {
            report(&e, json_errors, "Error");
            process::exit(1);
        }
    }
}

fn report(error: &scaffold::error::ApiError, json: bool, prefix: &str) {
    if json {
        eprintln!("{}", error_json(error));
    } else {
        eprintln!("{}: {}", prefix, error);
    }
}
