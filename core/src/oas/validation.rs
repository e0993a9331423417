#![deny(missing_docs)]

//! # Structural Validation
//!
//! Field contracts from the OpenAPI 3.x specification that the decoder
//! enforces before it hands out a node.
//!
//! Covered here:
//! - The document must declare a `3.x` version.
//! - Path keys must start with `/` and there must be at least one path.
//! - Operations must define at least one response.
//! - Parameters and Headers take `schema` or `content`, never both, and a
//!   `content` map holds exactly one entry.

use crate::error::DecodeResult;
use crate::oas::decoder::FieldPath;
use indexmap::IndexMap;

/// Checks that the `openapi` field names a 3.x version.
pub(crate) fn check_openapi_version(version: &str, path: &FieldPath) -> DecodeResult<()> {
    let major = version.split('.').next().unwrap_or_default();
    if major == "3" && version.len() > 1 {
        Ok(())
    } else {
        Err(path.error(format!(
            "an OpenAPI 3.x version, found '{}'",
            version
        )))
    }
}

/// Checks that a Paths Object key is a path template.
pub(crate) fn check_path_template(template: &str, path: &FieldPath) -> DecodeResult<()> {
    if !template.starts_with('/') {
        return Err(path.error("a path template starting with '/'"));
    }
    let opens = template.matches('{').count();
    let closes = template.matches('}').count();
    if opens != closes || template.contains("{}") {
        return Err(path.error("a path template with well-formed '{name}' segments"));
    }
    Ok(())
}

/// Checks that the document declares at least one path.
pub(crate) fn check_paths_non_empty<T>(
    paths: &IndexMap<String, T>,
    path: &FieldPath,
) -> DecodeResult<()> {
    if paths.is_empty() {
        Err(path.error("a Paths Object with at least one path"))
    } else {
        Ok(())
    }
}

/// Checks that an operation declares at least one response.
pub(crate) fn check_responses_non_empty<T>(
    responses: &IndexMap<String, T>,
    path: &FieldPath,
) -> DecodeResult<()> {
    if responses.is_empty() {
        Err(path.error("a Responses Object with at least one response"))
    } else {
        Ok(())
    }
}

/// Checks that at most one of two mutually exclusive fields is present.
pub(crate) fn check_exclusive(
    has_first: bool,
    has_second: bool,
    first: &str,
    second: &str,
    path: &FieldPath,
) -> DecodeResult<()> {
    if has_first && has_second {
        Err(path.error(format!(
            "either '{}' or '{}', not both",
            first, second
        )))
    } else {
        Ok(())
    }
}

/// Checks that a parameter/header `content` map has exactly one entry.
pub(crate) fn check_single_content<T>(
    content: &IndexMap<String, T>,
    path: &FieldPath,
) -> DecodeResult<()> {
    if content.len() == 1 {
        Ok(())
    } else {
        Err(path.error("a content map with exactly one media type"))
    }
}
