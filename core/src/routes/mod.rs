#![deny(missing_docs)]

//! # Route Adapter
//!
//! Turns each Path Item / Operation pair of a decoded document into an
//! [`Endpoint`] and answers requests for it:
//!
//! - body-bearing methods (post, put, patch) validate the request body first;
//! - the reply body is synthesized from the selected success response.

pub mod responses;

use crate::mock::{SynthesisOptions, Synthesizer};
use crate::oas::models::{HttpMethod, OpenApiDocument, Operation, Parameter, PathItem};
use crate::oas::refs::RefOr;
use crate::oas::resolver::ComponentResolver;
use crate::oas::schema::Schema;
use crate::validate::{ValidationError, ValidationMode, Validator};
use derive_more::{Display, From};
use rand::Rng;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// The request body an endpoint accepts.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestShape<'a> {
    /// Whether a body must be sent.
    pub required: bool,
    /// Media type whose schema was selected.
    pub media_type: Option<&'a str>,
    /// Schema of the selected media type.
    pub schema: Option<&'a RefOr<Schema>>,
}

/// One routable operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint<'a> {
    /// Declared or derived operation id.
    pub operation_id: &'a str,
    /// HTTP method.
    pub method: HttpMethod,
    /// Path template, e.g. `/pets/{petId}`.
    pub path: &'a str,
    /// Names of the `{name}` segments of the template, in order.
    pub path_params: Vec<String>,
    /// Path-level and operation-level parameters, the latter overriding.
    pub parameters: Vec<&'a Parameter>,
    /// The operation itself.
    pub operation: &'a Operation,
    /// Responses key that was selected, e.g. `201`.
    pub response_key: &'a str,
    /// Status the endpoint replies with.
    pub status: u16,
    /// Media type of the reply body, if the response has content.
    pub response_media_type: Option<&'a str>,
    /// Schema of the reply body.
    pub response_schema: Option<&'a RefOr<Schema>>,
    /// Accepted request body, when the operation declares one.
    pub request: Option<RequestShape<'a>>,
}

/// What an endpoint sends back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MockReply {
    /// HTTP status.
    pub status: u16,
    /// JSON body, absent when the response declares no content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

/// Why a request was not answered.
#[derive(Debug, Display, From)]
pub enum RouteError {
    /// No endpoint carries that operation id.
    #[from(ignore)]
    #[display("unknown operation '{_0}'")]
    UnknownOperation(String),
    /// The request body did not satisfy the schema.
    #[display("request rejected: {_0}")]
    Rejected(ValidationError),
}

impl std::error::Error for RouteError {}

/// Extracts the `{name}` parameter names of a path template, in order.
pub fn path_parameters(template: &str) -> Vec<String> {
    static PARAM_RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    let re = PARAM_RE.get_or_init(|| Regex::new(r"\{([^{}/]+)\}").expect("Invalid regex"));
    re.captures_iter(template)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Builds every endpoint of the document, in path then method order.
///
/// References to responses, request bodies and parameters are followed
/// through the document's components. Unresolvable ones leave the endpoint
/// without the corresponding schema.
pub fn build_endpoints(document: &OpenApiDocument) -> Vec<Endpoint<'_>> {
    let resolver = ComponentResolver::for_document(document);
    document
        .paths
        .iter()
        .flat_map(|(path, item)| {
            item.operations()
                .map(move |(method, operation)| build_endpoint(resolver, path, item, method, operation))
        })
        .collect()
}

fn build_endpoint<'a>(
    resolver: ComponentResolver<'a>,
    path: &'a str,
    item: &'a PathItem,
    method: HttpMethod,
    operation: &'a Operation,
) -> Endpoint<'a> {
    let (response_key, response) = responses::select_response(method, &operation.responses)
        .map(|(key, slot)| (key, resolver.response_of(slot).ok()))
        .unwrap_or(("default", None));

    let (response_media_type, response_schema) = response
        .and_then(|r| responses::select_media_type(&r.content))
        .map(|(media, content)| (Some(media), content.schema.as_ref()))
        .unwrap_or((None, None));

    let request = operation
        .request_body
        .as_ref()
        .and_then(|slot| resolver.request_body_of(slot).ok())
        .map(|body| {
            let selected = responses::select_media_type(&body.content);
            RequestShape {
                required: body.required,
                media_type: selected.map(|(media, _)| media),
                schema: selected.and_then(|(_, content)| content.schema.as_ref()),
            }
        });

    Endpoint {
        operation_id: &operation.operation_id,
        method,
        path,
        path_params: path_parameters(path),
        parameters: merge_parameters(resolver, &item.parameters, &operation.parameters),
        operation,
        response_key,
        status: responses::status_code(response_key),
        response_media_type,
        response_schema,
        request,
    }
}

fn merge_parameters<'a>(
    resolver: ComponentResolver<'a>,
    shared: &'a [RefOr<Parameter>],
    own: &'a [RefOr<Parameter>],
) -> Vec<&'a Parameter> {
    let resolve = |slot: &'a RefOr<Parameter>| match slot {
        RefOr::T(parameter) => Some(parameter),
        RefOr::Ref(reference) => resolver.parameter(reference).ok().map(|r| r.item),
    };

    let mut merged: Vec<&Parameter> = shared.iter().filter_map(resolve).collect();
    for parameter in own.iter().filter_map(resolve) {
        match merged
            .iter_mut()
            .find(|p| p.name == parameter.name && p.location == parameter.location)
        {
            Some(existing) => *existing = parameter,
            None => merged.push(parameter),
        }
    }
    merged
}

/// Answers requests for a document's endpoints with synthesized replies.
#[derive(Debug, Clone)]
pub struct RouteAdapter<'a> {
    endpoints: Vec<Endpoint<'a>>,
    synthesizer: Synthesizer<'a>,
    validator: Validator<'a>,
}

impl<'a> RouteAdapter<'a> {
    /// Builds the endpoints of `document`.
    pub fn new(document: &'a OpenApiDocument) -> Self {
        let endpoints = build_endpoints(document);
        debug!(endpoints = endpoints.len(), "route adapter ready");
        Self {
            endpoints,
            synthesizer: Synthesizer::for_document(document),
            validator: Validator::for_document(document),
        }
    }

    /// Sets the synthesis options used for reply bodies.
    pub fn with_synthesis_options(mut self, options: SynthesisOptions) -> Self {
        self.synthesizer = self.synthesizer.with_options(options);
        self
    }

    /// Sets the validation mode used for request bodies.
    pub fn with_validation_mode(mut self, mode: ValidationMode) -> Self {
        self.validator = self.validator.with_mode(mode);
        self
    }

    /// All endpoints, in path then method order.
    pub fn endpoints(&self) -> &[Endpoint<'a>] {
        &self.endpoints
    }

    /// The endpoint with `operation_id`.
    pub fn endpoint(&self, operation_id: &str) -> Option<&Endpoint<'a>> {
        self.endpoints
            .iter()
            .find(|endpoint| endpoint.operation_id == operation_id)
    }

    /// Handles a request for `operation_id`.
    pub fn handle<R: Rng + ?Sized>(
        &self,
        operation_id: &str,
        body: Option<&Value>,
        rng: &mut R,
    ) -> Result<MockReply, RouteError> {
        let endpoint = self
            .endpoint(operation_id)
            .ok_or_else(|| RouteError::UnknownOperation(operation_id.to_string()))?;
        self.respond(endpoint, body, rng)
    }

    /// Validates the request body when the method carries one, then builds
    /// the reply.
    pub fn respond<R: Rng + ?Sized>(
        &self,
        endpoint: &Endpoint<'a>,
        body: Option<&Value>,
        rng: &mut R,
    ) -> Result<MockReply, RouteError> {
        if endpoint.method.is_body_bearing() {
            if let Err(err) = self.check_request(endpoint, body) {
                warn!(
                    operation = endpoint.operation_id,
                    path = %err.path,
                    reason = %err.reason,
                    "request rejected"
                );
                return Err(err.into());
            }
        }

        Ok(self.reply(endpoint, rng))
    }

    /// Builds the reply for an endpoint without looking at any request.
    pub fn reply<R: Rng + ?Sized>(&self, endpoint: &Endpoint<'a>, rng: &mut R) -> MockReply {
        let body = endpoint
            .response_schema
            .map(|schema| self.synthesizer.synthesize(schema, rng));
        MockReply {
            status: endpoint.status,
            body,
        }
    }

    /// Checks a request body against the endpoint's request schema.
    pub fn check_request(
        &self,
        endpoint: &Endpoint<'a>,
        body: Option<&Value>,
    ) -> Result<(), ValidationError> {
        let Some(request) = &endpoint.request else {
            return Ok(());
        };
        match (body, request.schema) {
            (None, _) if request.required => Err(ValidationError {
                reason: "request body is required".to_string(),
                path: "$".to_string(),
            }),
            (Some(value), Some(schema)) => self.validator.validate(value, schema),
            _ => Ok(()),
        }
    }
}
