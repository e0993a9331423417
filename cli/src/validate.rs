#![deny(missing_docs)]

//! # Validate Command
//!
//! Checks a JSON payload file against an endpoint's request body schema.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use dymock_core::{RouteAdapter, RouteError, ValidationMode};
use serde_json::Value;

use crate::error::{CliError, CliResult};
use crate::spec::{self, SpecArgs};

/// Arguments for the validate command.
#[derive(clap::Args, Debug, Clone)]
pub struct ValidateArgs {
    #[clap(flatten)]
    pub spec: SpecArgs,

    /// Operation id of the endpoint.
    #[clap(long)]
    pub operation: String,

    /// JSON file holding the request body.
    #[clap(long)]
    pub payload: PathBuf,

    /// Also check enums, bounds, composition and nested properties.
    #[clap(long)]
    pub strict: bool,
}

/// Validates the payload; a rejected payload is an error.
pub fn execute(args: &ValidateArgs, out: &mut impl Write) -> CliResult<()> {
    let document = spec::load(&args.spec.spec)?;
    let mode = if args.strict {
        ValidationMode::Strict
    } else {
        ValidationMode::Lenient
    };
    let adapter = RouteAdapter::new(&document).with_validation_mode(mode);
    let endpoint = adapter
        .endpoint(&args.operation)
        .ok_or_else(|| RouteError::UnknownOperation(args.operation.clone()))?;

    let payload: Value = serde_json::from_str(&fs::read_to_string(&args.payload)?)?;
    adapter
        .check_request(endpoint, Some(&payload))
        .map_err(CliError::Rejected)?;

    writeln!(out, "{}: payload accepted", endpoint.operation_id)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, TempDir};

    const SPEC: &str = r#"{
        "openapi": "3.0.3",
        "info": {"title": "Pets", "version": "1"},
        "paths": {
            "/pets": {
                "post": {
                    "operationId": "createPet",
                    "requestBody": {
                        "required": true,
                        "content": {"application/json": {"schema": {
                            "type": "object",
                            "required": ["name"],
                            "properties": {
                                "name": {"type": "string"},
                                "age": {"type": "integer", "minimum": 0}
                            }
                        }}}
                    },
                    "responses": {"201": {"description": "Created"}}
                }
            }
        }
    }"#;

    fn run(payload: &str, strict: bool) -> (TempDir, CliResult<String>) {
        let dir = tempdir().unwrap();
        let spec_path = dir.path().join("pets.json");
        let payload_path = dir.path().join("payload.json");
        fs::write(&spec_path, SPEC).unwrap();
        fs::write(&payload_path, payload).unwrap();

        let args = ValidateArgs {
            spec: SpecArgs { spec: spec_path },
            operation: "createPet".into(),
            payload: payload_path,
            strict,
        };
        let mut out = Vec::new();
        let result = execute(&args, &mut out).map(|_| String::from_utf8(out).unwrap());
        (dir, result)
    }

    #[test]
    fn test_valid_payload() {
        let (_dir, result) = run(r#"{"name": "Rex"}"#, false);
        assert_eq!(result.unwrap(), "createPet: payload accepted\n");
    }

    #[test]
    fn test_missing_required_property_is_rejected() {
        let (_dir, result) = run(r#"{"age": 3}"#, false);
        match result.unwrap_err() {
            CliError::Rejected(err) => assert_eq!(err.reason, "missing required property 'name'"),
            other => panic!("unexpected error {}", other),
        }
    }

    #[test]
    fn test_strict_mode_checks_bounds() {
        let payload = r#"{"name": "Rex", "age": -1}"#;
        let (_dir, lenient) = run(payload, false);
        assert!(lenient.is_ok());

        let (_dir, strict) = run(payload, true);
        let err = strict.unwrap_err();
        assert!(err.to_string().contains("$.age"));
    }

    #[test]
    fn test_malformed_payload() {
        let (_dir, result) = run("{name", false);
        assert!(matches!(result, Err(CliError::Json(_))));
    }
}
