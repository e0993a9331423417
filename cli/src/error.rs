#![deny(missing_docs)]

//! # CLI Errors
//!
//! Error types for the CLI crate.

use derive_more::{Display, From};
use dymock_core::{AppError, RouteError, ValidationError};

/// Main error enum for CLI operations.
#[derive(Debug, Display, From)]
pub enum CliError {
    /// IO Error wrapper.
    #[display("IO Error: {}", _0)]
    Io(std::io::Error),

    /// The document could not be loaded or decoded.
    #[display("{}", _0)]
    App(AppError),

    /// A request could not be answered.
    #[display("{}", _0)]
    Route(RouteError),

    /// A payload was checked and rejected.
    #[display("Payload rejected: {}", _0)]
    Rejected(ValidationError),

    /// A payload or reply could not be (de)serialized.
    #[display("JSON Error: {}", _0)]
    Json(serde_json::Error),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for CliError {}

/// Result type alias.
pub type CliResult<T> = Result<T, CliError>;
