#![deny(missing_docs)]

//! # dymock CLI
//!
//! Command Line Interface for serving mock data from an OpenAPI 3.x document.
//!
//! Supported Commands:
//! - `check`: Decode a document and print a summary.
//! - `routes`: List endpoints with their reply status.
//! - `mock`: Print a synthesized reply for one endpoint.
//! - `validate`: Check a JSON payload against an endpoint's request body.

use std::io;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::error::CliResult;

mod check;
mod error;
mod logging;
mod mock;
mod routes;
mod spec;
mod validate;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Mock data from OpenAPI 3.x documents")]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[clap(short, long, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode the document and print a one-line summary.
    Check(check::CheckArgs),
    /// List every endpoint as `METHOD path operationId -> status`.
    Routes(routes::RoutesArgs),
    /// Print the synthesized reply for an endpoint.
    Mock(mock::MockArgs),
    /// Validate a JSON payload against an endpoint's request body.
    Validate(validate::ValidateArgs),
}

fn run(cli: &Cli) -> CliResult<()> {
    let mut out = io::stdout().lock();
    match &cli.command {
        Commands::Check(args) => check::execute(args, &mut out),
        Commands::Routes(args) => routes::execute(args, &mut out),
        Commands::Mock(args) => mock::execute(args, &mut out),
        Commands::Validate(args) => validate::execute(args, &mut out),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
