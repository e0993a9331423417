#![deny(missing_docs)]

//! # Document Loader
//!
//! Turns JSON or YAML text into the untyped tree the decoder consumes, and
//! optionally straight into a decoded document.

use crate::error::{AppError, AppResult};
use crate::oas::decoder;
use crate::oas::models::OpenApiDocument;
use serde_json::Value;
use std::path::Path;
use tracing::warn;

/// Text syntax of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// JSON text.
    Json,
    /// YAML text.
    Yaml,
}

impl DocumentFormat {
    /// Picks the format from a file extension (`json`, `yaml`, `yml`), ignoring case.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    /// Picks the format from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

/// Parses document text into an untyped tree.
pub fn parse_document(text: &str, format: DocumentFormat) -> AppResult<Value> {
    if text.trim().is_empty() {
        return Err(AppError::Load("document is empty".into()));
    }
    match format {
        DocumentFormat::Json => serde_json::from_str(text)
            .map_err(|e| AppError::Load(format!("invalid JSON: {}", e))),
        DocumentFormat::Yaml => serde_yaml::from_str(text)
            .map_err(|e| AppError::Load(format!("invalid YAML: {}", e))),
    }
}

/// Parses and decodes a document.
pub fn load_document(text: &str, format: DocumentFormat) -> AppResult<OpenApiDocument> {
    let raw = parse_document(text, format)?;
    decoder::decode(&raw).map_err(|err| {
        warn!(path = %err.path, expected = %err.expected, "document failed to decode");
        AppError::Structural(err)
    })
}
