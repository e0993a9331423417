#![deny(missing_docs)]

//! # Check Command
//!
//! Decodes a document and prints a one-line summary.

use std::io::Write;

use crate::error::CliResult;
use crate::spec::{self, SpecArgs};

/// Arguments for the check command.
#[derive(clap::Args, Debug, Clone)]
pub struct CheckArgs {
    #[clap(flatten)]
    pub spec: SpecArgs,
}

/// Executes the check.
pub fn execute(args: &CheckArgs, out: &mut impl Write) -> CliResult<()> {
    let document = spec::load(&args.spec.spec)?;
    writeln!(
        out,
        "{} {} (OpenAPI {}): {} paths, {} operations",
        document.info.title,
        document.info.version,
        document.openapi,
        document.paths.len(),
        document.operations().count()
    )?;
    Ok(())
}
