#![deny(missing_docs)]

//! # OpenAPI Models
//!
//! The typed document graph produced by the decoder.
//!
//! The graph is plain owned data: it is built once, never mutated afterwards,
//! and can be shared across threads by reference.

use crate::oas::refs::RefOr;
use crate::oas::schema::Schema;
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;

/// Vendor extensions (`x-` keys), kept verbatim and uninterpreted.
pub type Extensions = IndexMap<String, Value>;

/// The root of the document.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenApiDocument {
    /// The `openapi` version string (always `3.x`).
    pub openapi: String,
    /// API metadata.
    pub info: Info,
    /// `jsonSchemaDialect` (3.1+).
    pub json_schema_dialect: Option<String>,
    /// Top-level servers.
    pub servers: Vec<Server>,
    /// Path templates to Path Items. Never empty.
    pub paths: IndexMap<String, PathItem>,
    /// `x-` keys found inside the Paths Object.
    pub paths_extensions: Extensions,
    /// Webhooks (3.1+).
    pub webhooks: IndexMap<String, RefOr<PathItem>>,
    /// Reusable components.
    pub components: Option<Components>,
    /// Document-wide security requirements.
    pub security: Vec<SecurityRequirement>,
    /// Tag metadata.
    pub tags: Vec<Tag>,
    /// External documentation.
    pub external_docs: Option<ExternalDocs>,
    /// Vendor extensions.
    pub extensions: Extensions,
}

impl OpenApiDocument {
    /// Iterates over every operation with its path template and method.
    pub fn operations(&self) -> impl Iterator<Item = (&str, HttpMethod, &Operation)> {
        self.paths.iter().flat_map(|(path, item)| {
            item.operations()
                .map(move |(method, op)| (path.as_str(), method, op))
        })
    }

    /// Finds an operation by its (declared or derived) id.
    pub fn find_operation(&self, operation_id: &str) -> Option<(&str, HttpMethod, &Operation)> {
        self.operations()
            .find(|(_, _, op)| op.operation_id == operation_id)
    }
}

/// API metadata.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Info {
    /// Title. Required.
    pub title: String,
    /// API version. Required.
    pub version: String,
    /// Short summary.
    pub summary: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Terms of service URL.
    pub terms_of_service: Option<String>,
    /// Contact information.
    pub contact: Option<Contact>,
    /// License information.
    pub license: Option<License>,
    /// Vendor extensions.
    pub extensions: Extensions,
}

/// Contact information.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Contact {
    /// Name.
    pub name: Option<String>,
    /// URL.
    pub url: Option<String>,
    /// Email.
    pub email: Option<String>,
}

/// License information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct License {
    /// License name. Required.
    pub name: String,
    /// SPDX identifier.
    pub identifier: Option<String>,
    /// License URL.
    pub url: Option<String>,
}

/// A server the API is reachable on.
#[derive(Debug, Clone, PartialEq)]
pub struct Server {
    /// URL template. Required.
    pub url: String,
    /// Description.
    pub description: Option<String>,
    /// Template variables.
    pub variables: IndexMap<String, ServerVariable>,
}

/// Substitution for one `{variable}` in a server URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerVariable {
    /// Default value. Required.
    pub default: String,
    /// Allowed values.
    pub enum_values: Vec<String>,
    /// Description.
    pub description: Option<String>,
}

/// Tag metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Tag name. Required.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// External documentation.
    pub external_docs: Option<ExternalDocs>,
}

/// Link to external documentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalDocs {
    /// URL. Required.
    pub url: String,
    /// Description.
    pub description: Option<String>,
}

/// Scheme name to required scopes.
pub type SecurityRequirement = IndexMap<String, Vec<String>>;

/// HTTP methods an operation can be declared on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// GET
    Get,
    /// PUT
    Put,
    /// POST
    Post,
    /// DELETE
    Delete,
    /// PATCH
    Patch,
    /// OPTIONS
    Options,
    /// HEAD
    Head,
    /// TRACE
    Trace,
}

impl HttpMethod {
    /// Every method, in Path Item field order.
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Put,
        HttpMethod::Post,
        HttpMethod::Delete,
        HttpMethod::Patch,
        HttpMethod::Options,
        HttpMethod::Head,
        HttpMethod::Trace,
    ];

    /// The lowercase key used in Path Items.
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Put => "put",
            HttpMethod::Post => "post",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Trace => "trace",
        }
    }

    /// Parses a method name, ignoring case.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(name))
    }

    /// Methods whose requests carry a body the adapter validates.
    pub fn is_body_bearing(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_uppercase())
    }
}

/// The operations and shared settings of one path.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathItem {
    /// `$ref` to a Path Item defined elsewhere.
    pub reference: Option<String>,
    /// Summary.
    pub summary: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// GET operation.
    pub get: Option<Operation>,
    /// PUT operation.
    pub put: Option<Operation>,
    /// POST operation.
    pub post: Option<Operation>,
    /// DELETE operation.
    pub delete: Option<Operation>,
    /// PATCH operation.
    pub patch: Option<Operation>,
    /// OPTIONS operation.
    pub options: Option<Operation>,
    /// HEAD operation.
    pub head: Option<Operation>,
    /// TRACE operation.
    pub trace: Option<Operation>,
    /// Parameters shared by every operation on this path.
    pub parameters: Vec<RefOr<Parameter>>,
    /// Path-level servers.
    pub servers: Vec<Server>,
    /// Vendor extensions.
    pub extensions: Extensions,
}

impl PathItem {
    /// The operation declared for `method`.
    pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
        match method {
            HttpMethod::Get => self.get.as_ref(),
            HttpMethod::Put => self.put.as_ref(),
            HttpMethod::Post => self.post.as_ref(),
            HttpMethod::Delete => self.delete.as_ref(),
            HttpMethod::Patch => self.patch.as_ref(),
            HttpMethod::Options => self.options.as_ref(),
            HttpMethod::Head => self.head.as_ref(),
            HttpMethod::Trace => self.trace.as_ref(),
        }
    }

    pub(crate) fn operation_slot(&mut self, method: HttpMethod) -> &mut Option<Operation> {
        match method {
            HttpMethod::Get => &mut self.get,
            HttpMethod::Put => &mut self.put,
            HttpMethod::Post => &mut self.post,
            HttpMethod::Delete => &mut self.delete,
            HttpMethod::Patch => &mut self.patch,
            HttpMethod::Options => &mut self.options,
            HttpMethod::Head => &mut self.head,
            HttpMethod::Trace => &mut self.trace,
        }
    }

    /// Declared operations in method order.
    pub fn operations(&self) -> impl Iterator<Item = (HttpMethod, &Operation)> {
        HttpMethod::ALL
            .into_iter()
            .filter_map(move |m| self.operation(m).map(|op| (m, op)))
    }
}

/// Whether an operation id came from the document or was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationIdSource {
    /// `operationId` was present.
    Declared,
    /// Computed as `<method>_<path>`.
    Derived,
}

/// A single API operation on a path.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    /// Declared `operationId`, or the derived default.
    pub operation_id: String,
    /// Where `operation_id` came from.
    pub operation_id_source: OperationIdSource,
    /// Summary.
    pub summary: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// External documentation.
    pub external_docs: Option<ExternalDocs>,
    /// Operation parameters.
    pub parameters: Vec<RefOr<Parameter>>,
    /// Request body.
    pub request_body: Option<RefOr<RequestBody>>,
    /// Status code (or `default`) to response. Never empty.
    pub responses: IndexMap<String, RefOr<Response>>,
    /// Callbacks keyed by name.
    pub callbacks: IndexMap<String, RefOr<Callback>>,
    /// Tags.
    pub tags: Vec<String>,
    /// `deprecated`.
    pub deprecated: bool,
    /// Security requirements overriding the document ones.
    pub security: Vec<SecurityRequirement>,
    /// Operation-level servers.
    pub servers: Vec<Server>,
    /// Vendor extensions.
    pub extensions: Extensions,
}

/// Runtime expression to Path Item.
pub type Callback = IndexMap<String, PathItem>;

/// Where a parameter is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterLocation {
    /// `query`
    Query,
    /// `path`
    Path,
    /// `header`
    Header,
    /// `cookie`
    Cookie,
}

impl ParameterLocation {
    /// Parses the `in` field.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "query" => Some(ParameterLocation::Query),
            "path" => Some(ParameterLocation::Path),
            "header" => Some(ParameterLocation::Header),
            "cookie" => Some(ParameterLocation::Cookie),
            _ => None,
        }
    }

    /// The `in` spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            ParameterLocation::Query => "query",
            ParameterLocation::Path => "path",
            ParameterLocation::Header => "header",
            ParameterLocation::Cookie => "cookie",
        }
    }
}

/// How a parameter or header describes its value: a schema or a content map,
/// never both.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ValueShape {
    /// Described by `schema`.
    Schema(RefOr<Schema>),
    /// Described by a single-entry `content` map.
    Content(IndexMap<String, MediaType>),
    /// Neither was given.
    #[default]
    Unspecified,
}

impl ValueShape {
    /// The schema slot, if the shape is schema-based.
    pub fn schema(&self) -> Option<&RefOr<Schema>> {
        match self {
            ValueShape::Schema(schema) => Some(schema),
            _ => None,
        }
    }
}

/// A Parameter Object.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Name. Required.
    pub name: String,
    /// Location. Required.
    pub location: ParameterLocation,
    /// Description.
    pub description: Option<String>,
    /// `required`.
    pub required: bool,
    /// `deprecated`.
    pub deprecated: bool,
    /// `allowEmptyValue`.
    pub allow_empty_value: bool,
    /// Serialization style.
    pub style: Option<String>,
    /// `explode`.
    pub explode: Option<bool>,
    /// `allowReserved`.
    pub allow_reserved: bool,
    /// Schema or content.
    pub shape: ValueShape,
    /// `example`.
    pub example: Option<Value>,
    /// Named examples.
    pub examples: IndexMap<String, RefOr<Example>>,
    /// Vendor extensions.
    pub extensions: Extensions,
}

/// A Header Object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Header {
    /// Description.
    pub description: Option<String>,
    /// `required`.
    pub required: bool,
    /// `deprecated`.
    pub deprecated: bool,
    /// Serialization style.
    pub style: Option<String>,
    /// `explode`.
    pub explode: Option<bool>,
    /// Schema or content.
    pub shape: ValueShape,
    /// `example`.
    pub example: Option<Value>,
    /// Vendor extensions.
    pub extensions: Extensions,
}

/// A Request Body Object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RequestBody {
    /// Description.
    pub description: Option<String>,
    /// Media type to payload description.
    pub content: IndexMap<String, MediaType>,
    /// `required`, false by default.
    pub required: bool,
    /// Vendor extensions.
    pub extensions: Extensions,
}

/// A Response Object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Response {
    /// Description. Required.
    pub description: String,
    /// Response headers.
    pub headers: IndexMap<String, RefOr<Header>>,
    /// Media type to payload description.
    pub content: IndexMap<String, MediaType>,
    /// Design-time links.
    pub links: IndexMap<String, RefOr<Link>>,
    /// Vendor extensions.
    pub extensions: Extensions,
}

/// A Media Type Object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MediaType {
    /// Payload schema.
    pub schema: Option<RefOr<Schema>>,
    /// `example`.
    pub example: Option<Value>,
    /// Named examples.
    pub examples: IndexMap<String, RefOr<Example>>,
    /// Per-property encoding.
    pub encoding: IndexMap<String, Encoding>,
    /// Vendor extensions.
    pub extensions: Extensions,
}

/// An Encoding Object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Encoding {
    /// `contentType`.
    pub content_type: Option<String>,
    /// Part headers.
    pub headers: IndexMap<String, RefOr<Header>>,
    /// Serialization style.
    pub style: Option<String>,
    /// `explode`.
    pub explode: Option<bool>,
    /// `allowReserved`.
    pub allow_reserved: bool,
}

/// An Example Object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Example {
    /// Summary.
    pub summary: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Embedded literal.
    pub value: Option<Value>,
    /// URL of the literal.
    pub external_value: Option<String>,
}

/// A Link Object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Link {
    /// `operationRef`.
    pub operation_ref: Option<String>,
    /// `operationId`.
    pub operation_id: Option<String>,
    /// Parameter name to value or runtime expression.
    pub parameters: IndexMap<String, Value>,
    /// Request body value or runtime expression.
    pub request_body: Option<Value>,
    /// Description.
    pub description: Option<String>,
    /// Server override.
    pub server: Option<Server>,
}

/// A Security Scheme Object.
#[derive(Debug, Clone, PartialEq)]
pub struct SecurityScheme {
    /// Classification and scheme-specific fields.
    pub kind: SecuritySchemeKind,
    /// Description.
    pub description: Option<String>,
}

/// Classification of a security scheme.
#[derive(Debug, Clone, PartialEq)]
pub enum SecuritySchemeKind {
    /// API key in a header, query string or cookie.
    ApiKey {
        /// Parameter name.
        name: String,
        /// Location.
        location: ParameterLocation,
    },
    /// HTTP authentication (basic, bearer, ...).
    Http {
        /// Scheme name.
        scheme: String,
        /// Bearer token format hint.
        bearer_format: Option<String>,
    },
    /// OAuth2 flows.
    OAuth2 {
        /// Flow name (`implicit`, `password`, ...) to flow settings.
        flows: IndexMap<String, OAuthFlow>,
    },
    /// OpenID Connect discovery.
    OpenIdConnect {
        /// Discovery URL.
        url: String,
    },
    /// Mutual TLS.
    MutualTls,
}

/// One OAuth2 flow.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OAuthFlow {
    /// `authorizationUrl`.
    pub authorization_url: Option<String>,
    /// `tokenUrl`.
    pub token_url: Option<String>,
    /// `refreshUrl`.
    pub refresh_url: Option<String>,
    /// Scope name to description.
    pub scopes: IndexMap<String, String>,
}

/// Reusable objects, each entry a reference or an inline definition.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Components {
    /// `schemas`
    pub schemas: IndexMap<String, RefOr<Schema>>,
    /// `responses`
    pub responses: IndexMap<String, RefOr<Response>>,
    /// `parameters`
    pub parameters: IndexMap<String, RefOr<Parameter>>,
    /// `examples`
    pub examples: IndexMap<String, RefOr<Example>>,
    /// `requestBodies`
    pub request_bodies: IndexMap<String, RefOr<RequestBody>>,
    /// `headers`
    pub headers: IndexMap<String, RefOr<Header>>,
    /// `securitySchemes`
    pub security_schemes: IndexMap<String, RefOr<SecurityScheme>>,
    /// `links`
    pub links: IndexMap<String, RefOr<Link>>,
    /// `callbacks`
    pub callbacks: IndexMap<String, RefOr<Callback>>,
    /// `pathItems`
    pub path_items: IndexMap<String, RefOr<PathItem>>,
    /// Vendor extensions.
    pub extensions: Extensions,
}
