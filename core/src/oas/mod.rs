#![deny(missing_docs)]

//! # OpenAPI Module
//!
//! - **models**: the typed document graph.
//! - **schema**: Schema Objects.
//! - **refs**: the `Reference | T` union.
//! - **decoder**: untyped tree to graph.
//! - **resolver**: component lookups for references.
//! - **loader**: JSON/YAML text to tree.
//! - **naming**: derived operation ids.

pub mod decoder;
pub mod loader;
pub mod models;
pub mod naming;
pub mod refs;
pub mod resolver;
pub mod schema;
mod validation;

pub use decoder::decode;
pub use loader::{load_document, parse_document, DocumentFormat};
pub use models::{
    Components, HttpMethod, MediaType, OpenApiDocument, Operation, Parameter, PathItem,
    RequestBody, Response,
};
pub use refs::{RefOr, Reference};
pub use resolver::{ComponentResolver, ResolveError};
pub use schema::{Schema, SchemaType};
