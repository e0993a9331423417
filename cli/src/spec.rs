#![deny(missing_docs)]

//! # Document Loading
//!
//! The `--spec` argument shared by every command, and reading the file it
//! names.

use std::fs;
use std::path::{Path, PathBuf};

use dymock_core::{load_document, DocumentFormat, OpenApiDocument};
use tracing::{debug, info};

use crate::error::CliResult;

/// Arguments naming the OpenAPI document.
#[derive(clap::Args, Debug, Clone)]
pub struct SpecArgs {
    /// Path to the OpenAPI 3.x document (JSON or YAML).
    #[clap(long, env = "DYMOCK_SPEC")]
    pub spec: PathBuf,
}

/// Reads and decodes the document at `path`.
///
/// The format follows the extension; anything else is read as YAML, which
/// also accepts JSON text.
pub fn load(path: &Path) -> CliResult<OpenApiDocument> {
    let format = DocumentFormat::from_path(path).unwrap_or_else(|| {
        debug!(path = %path.display(), "unknown extension, reading as YAML");
        DocumentFormat::Yaml
    });
    let text = fs::read_to_string(path)?;
    let document = load_document(&text, format)?;
    info!(path = %path.display(), "loaded document");
    Ok(document)
}
