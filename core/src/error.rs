#![deny(missing_docs)]

//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace, plus the
//! `StructuralError` raised by the document decoder.

use derive_more::{Display, From};
use std::fmt;

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// The document text could not be read or parsed into a tree.
    /// Ignored for `From<String>` to avoid conflict with General.
    #[from(ignore)]
    #[display("Load Error: {_0}")]
    Load(String),

    /// The parsed tree does not describe a well-formed OpenAPI 3.x document.
    #[display("Structural Error: {_0}")]
    Structural(StructuralError),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;

/// A required field is absent or a field has the wrong shape.
///
/// Always fatal to the decode that raised it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralError {
    /// Dotted path of the offending field (empty for the document root).
    pub path: String,
    /// Human readable description of the shape that was expected.
    pub expected: String,
}

impl StructuralError {
    /// Creates an error for `path` expecting `expected`.
    pub fn new(path: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            expected: expected.into(),
        }
    }
}

impl fmt::Display for StructuralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "$" } else { &self.path };
        write!(f, "{}: expected {}", path, self.expected)
    }
}

impl std::error::Error for StructuralError {}

/// Result alias used by the decoder.
pub type DecodeResult<T> = Result<T, StructuralError>;
