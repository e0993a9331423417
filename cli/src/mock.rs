#![deny(missing_docs)]

//! # Mock Command
//!
//! Prints the synthesized reply of one endpoint.

use std::io::Write;

use dymock_core::mock::DEFAULT_MAX_DEPTH;
use dymock_core::{RouteAdapter, RouteError, SynthesisOptions};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::error::CliResult;
use crate::spec::{self, SpecArgs};

/// Arguments for the mock command.
#[derive(clap::Args, Debug, Clone)]
pub struct MockArgs {
    #[clap(flatten)]
    pub spec: SpecArgs,

    /// Operation id of the endpoint (declared, or derived like `get__pets`).
    #[clap(long)]
    pub operation: String,

    /// Seed for reproducible output. Random when omitted.
    #[clap(long, env = "DYMOCK_SEED")]
    pub seed: Option<u64>,

    /// Containers nested deeper than this are emitted empty.
    #[clap(long, env = "DYMOCK_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,
}

/// Prints `{"status": ..., "body": ...}` as pretty JSON.
pub fn execute(args: &MockArgs, out: &mut impl Write) -> CliResult<()> {
    let document = spec::load(&args.spec.spec)?;
    let adapter = RouteAdapter::new(&document).with_synthesis_options(SynthesisOptions {
        max_depth: args.max_depth,
    });
    let endpoint = adapter
        .endpoint(&args.operation)
        .ok_or_else(|| RouteError::UnknownOperation(args.operation.clone()))?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    debug!(operation = endpoint.operation_id, seed = ?args.seed, "synthesizing reply");

    let reply = adapter.reply(endpoint, &mut rng);
    writeln!(out, "{}", serde_json::to_string_pretty(&reply)?)?;
    Ok(())
}
