#![deny(missing_docs)]

//! # Routes Command
//!
//! Lists every endpoint with the status it replies with.

use std::io::Write;

use dymock_core::RouteAdapter;

use crate::error::CliResult;
use crate::spec::{self, SpecArgs};

/// Arguments for the routes command.
#[derive(clap::Args, Debug, Clone)]
pub struct RoutesArgs {
    #[clap(flatten)]
    pub spec: SpecArgs,
}

/// Prints `METHOD path operationId -> status`, one endpoint per line.
pub fn execute(args: &RoutesArgs, out: &mut impl Write) -> CliResult<()> {
    let document = spec::load(&args.spec.spec)?;
    let adapter = RouteAdapter::new(&document);
    for endpoint in adapter.endpoints() {
        writeln!(
            out,
            "{} {} {} -> {}",
            endpoint.method, endpoint.path, endpoint.operation_id, endpoint.status
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_routes_listing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("api.yml");
        fs::write(
            &path,
            r#"
openapi: 3.0.3
info: {title: Pets, version: '1'}
paths:
  /pets:
    get:
      operationId: listPets
      responses: {'200': {description: OK}}
    post:
      responses:
        '200': {description: OK}
        '201': {description: Created}
  /pets/{id}:
    delete:
      responses: {'200': {description: Deleted}}
"#,
        )
        .unwrap();

        let args = RoutesArgs {
            spec: SpecArgs { spec: path },
        };
        let mut out = Vec::new();
        execute(&args, &mut out).unwrap();
        let expected = "GET /pets listPets -> 200\n\
                        POST /pets post__pets -> 201\n\
                        DELETE /pets/{id} delete__pets_{id} -> 200\n";
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }
}
