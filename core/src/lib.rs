#![deny(missing_docs)]

//! # dymock Core
//!
//! Core library for serving mock replies from an OpenAPI 3.x document.
//!
//! - **oas**: decode JSON/YAML text into a typed schema graph.
//! - **mock**: synthesize values for schema nodes.
//! - **validate**: check payloads against schema nodes.
//! - **routes**: map operations to endpoints and answer requests.

/// Shared error types.
pub mod error;

/// OpenAPI (OAS) document graph, decoder and loader.
pub mod oas;

/// Value synthesis.
pub mod mock;

/// Payload validation.
pub mod validate;

/// Endpoints and response selection.
pub mod routes;

pub use error::{AppError, AppResult, StructuralError};
pub use mock::{synthesize, SynthesisOptions, Synthesizer};
pub use oas::{decode, load_document, parse_document, DocumentFormat, OpenApiDocument};
pub use routes::{build_endpoints, Endpoint, MockReply, RouteAdapter, RouteError};
pub use validate::{validate, ValidationError, ValidationMode, Validator};
