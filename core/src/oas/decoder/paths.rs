#![deny(missing_docs)]

//! # Path and Operation Decoding
//!
//! Path Items, Operations and everything hanging off them: parameters,
//! request bodies, responses, headers, media types, encodings, examples,
//! links and callbacks.

use crate::error::DecodeResult;
use crate::oas::decoder::schema::decode_schema_at;
use crate::oas::decoder::{
    decode_external_docs, decode_security_requirement, decode_server, ref_or, Fields, FieldPath,
    EXTENSION_PREFIX,
};
use crate::oas::models::{
    Callback, Encoding, Example, Header, HttpMethod, Link, MediaType, Operation, OperationIdSource,
    Parameter, ParameterLocation, PathItem, RequestBody, Response, ValueShape,
};
use crate::oas::naming::default_operation_id;
use crate::oas::refs::RefOr;
use crate::oas::validation;
use serde_json::Value;

/// Decodes a Path Item. `template` is the path (or webhook name) it is
/// declared under, used to derive missing operation ids.
pub fn decode_path_item(raw: &Value, template: &str) -> DecodeResult<PathItem> {
    decode_path_item_at(raw, &FieldPath::root(), template)
}

/// Decodes one Operation declared as `method` on `template`.
pub fn decode_operation(raw: &Value, method: HttpMethod, template: &str) -> DecodeResult<Operation> {
    decode_operation_at(raw, &FieldPath::root(), method, template)
}

/// Decodes a `Parameter | Reference` slot.
pub fn decode_parameter(raw: &Value) -> DecodeResult<RefOr<Parameter>> {
    ref_or(raw, &FieldPath::root(), decode_parameter_at)
}

/// Decodes a `Header | Reference` slot.
pub fn decode_header(raw: &Value) -> DecodeResult<RefOr<Header>> {
    ref_or(raw, &FieldPath::root(), decode_header_at)
}

/// Decodes a `RequestBody | Reference` slot.
pub fn decode_request_body(raw: &Value) -> DecodeResult<RefOr<RequestBody>> {
    ref_or(raw, &FieldPath::root(), decode_request_body_at)
}

/// Decodes a `Response | Reference` slot.
pub fn decode_response(raw: &Value) -> DecodeResult<RefOr<Response>> {
    ref_or(raw, &FieldPath::root(), decode_response_at)
}

/// Decodes a Media Type Object.
pub fn decode_media_type(raw: &Value) -> DecodeResult<MediaType> {
    decode_media_type_at(raw, &FieldPath::root())
}

pub(crate) fn decode_path_item_at(
    value: &Value,
    path: &FieldPath,
    template: &str,
) -> DecodeResult<PathItem> {
    let fields = Fields::new(value, path, "a Path Item Object")?;
    let mut item = PathItem {
        reference: fields.str("$ref")?,
        summary: fields.str("summary")?,
        description: fields.str("description")?,
        parameters: fields.list("parameters", |v, p| ref_or(v, p, decode_parameter_at))?,
        servers: fields.list("servers", decode_server)?,
        extensions: fields.extensions(),
        ..PathItem::default()
    };
    for method in HttpMethod::ALL {
        *item.operation_slot(method) = fields.object(method.as_str(), |v, p| {
            decode_operation_at(v, p, method, template)
        })?;
    }
    Ok(item)
}

pub(crate) fn decode_operation_at(
    value: &Value,
    path: &FieldPath,
    method: HttpMethod,
    template: &str,
) -> DecodeResult<Operation> {
    let fields = Fields::new(value, path, "an Operation Object")?;

    fields.required("responses", "a Responses Object")?;
    let responses = fields.extensible_map("responses", |v, p| ref_or(v, p, decode_response_at))?;
    validation::check_responses_non_empty(&responses, &fields.at("responses"))?;

    let (operation_id, operation_id_source) = match fields.str("operationId")? {
        Some(id) => (id, OperationIdSource::Declared),
        None => (
            default_operation_id(method, template),
            OperationIdSource::Derived,
        ),
    };

    Ok(Operation {
        operation_id,
        operation_id_source,
        summary: fields.str("summary")?,
        description: fields.str("description")?,
        external_docs: fields.object("externalDocs", decode_external_docs)?,
        parameters: fields.list("parameters", |v, p| ref_or(v, p, decode_parameter_at))?,
        request_body: fields.object("requestBody", |v, p| ref_or(v, p, decode_request_body_at))?,
        responses,
        callbacks: fields.map("callbacks", |v, p| ref_or(v, p, decode_callback_at))?,
        tags: fields.strings("tags")?,
        deprecated: fields.flag("deprecated")?,
        security: fields.list("security", decode_security_requirement)?,
        servers: fields.list("servers", decode_server)?,
        extensions: fields.extensions(),
    })
}

pub(crate) fn decode_callback_at(value: &Value, path: &FieldPath) -> DecodeResult<Callback> {
    let entries = value
        .as_object()
        .ok_or_else(|| path.error("a Callback Object (a mapping of expressions to Path Items)"))?;
    let mut callback = Callback::new();
    for (expression, item) in entries {
        if expression.starts_with(EXTENSION_PREFIX) {
            continue;
        }
        let item = decode_path_item_at(item, &path.child(expression), expression)?;
        callback.insert(expression.clone(), item);
    }
    Ok(callback)
}

pub(crate) fn decode_parameter_at(value: &Value, path: &FieldPath) -> DecodeResult<Parameter> {
    let fields = Fields::new(value, path, "a Parameter Object")?;
    let name = fields.required_str("name")?;
    let location_name = fields.required_str("in")?;
    let location = ParameterLocation::parse(&location_name).ok_or_else(|| {
        fields.at("in").error(format!(
            "one of query, path, header, cookie, found '{}'",
            location_name
        ))
    })?;

    Ok(Parameter {
        name,
        location,
        description: fields.str("description")?,
        required: fields.flag("required")?,
        deprecated: fields.flag("deprecated")?,
        allow_empty_value: fields.flag("allowEmptyValue")?,
        style: fields.str("style")?,
        explode: fields.bool("explode")?,
        allow_reserved: fields.flag("allowReserved")?,
        shape: decode_value_shape(&fields)?,
        example: fields.raw("example"),
        examples: fields.map("examples", |v, p| ref_or(v, p, decode_example_at))?,
        extensions: fields.extensions(),
    })
}

pub(crate) fn decode_header_at(value: &Value, path: &FieldPath) -> DecodeResult<Header> {
    let fields = Fields::new(value, path, "a Header Object")?;
    Ok(Header {
        description: fields.str("description")?,
        required: fields.flag("required")?,
        deprecated: fields.flag("deprecated")?,
        style: fields.str("style")?,
        explode: fields.bool("explode")?,
        shape: decode_value_shape(&fields)?,
        example: fields.raw("example"),
        extensions: fields.extensions(),
    })
}

/// `schema` xor `content`, shared by Parameter and Header.
fn decode_value_shape(fields: &Fields<'_>) -> DecodeResult<ValueShape> {
    validation::check_exclusive(
        fields.has("schema"),
        fields.has("content"),
        "schema",
        "content",
        fields.path(),
    )?;

    if let Some(schema) = fields.object("schema", decode_schema_at)? {
        return Ok(ValueShape::Schema(schema));
    }
    if fields.has("content") {
        let content = fields.map("content", decode_media_type_at)?;
        validation::check_single_content(&content, &fields.at("content"))?;
        return Ok(ValueShape::Content(content));
    }
    Ok(ValueShape::Unspecified)
}

pub(crate) fn decode_request_body_at(value: &Value, path: &FieldPath) -> DecodeResult<RequestBody> {
    let fields = Fields::new(value, path, "a Request Body Object")?;
    Ok(RequestBody {
        description: fields.str("description")?,
        content: fields.map("content", decode_media_type_at)?,
        required: fields.flag("required")?,
        extensions: fields.extensions(),
    })
}

pub(crate) fn decode_response_at(value: &Value, path: &FieldPath) -> DecodeResult<Response> {
    let fields = Fields::new(value, path, "a Response Object")?;
    Ok(Response {
        description: fields.required_str("description")?,
        headers: fields.map("headers", |v, p| ref_or(v, p, decode_header_at))?,
        content: fields.map("content", decode_media_type_at)?,
        links: fields.map("links", |v, p| ref_or(v, p, decode_link_at))?,
        extensions: fields.extensions(),
    })
}

pub(crate) fn decode_media_type_at(value: &Value, path: &FieldPath) -> DecodeResult<MediaType> {
    let fields = Fields::new(value, path, "a Media Type Object")?;
    Ok(MediaType {
        schema: fields.object("schema", decode_schema_at)?,
        example: fields.raw("example"),
        examples: fields.map("examples", |v, p| ref_or(v, p, decode_example_at))?,
        encoding: fields.map("encoding", decode_encoding_at)?,
        extensions: fields.extensions(),
    })
}

fn decode_encoding_at(value: &Value, path: &FieldPath) -> DecodeResult<Encoding> {
    let fields = Fields::new(value, path, "an Encoding Object")?;
    Ok(Encoding {
        content_type: fields.str("contentType")?,
        headers: fields.map("headers", |v, p| ref_or(v, p, decode_header_at))?,
        style: fields.str("style")?,
        explode: fields.bool("explode")?,
        allow_reserved: fields.flag("allowReserved")?,
    })
}

pub(crate) fn decode_example_at(value: &Value, path: &FieldPath) -> DecodeResult<Example> {
    let fields = Fields::new(value, path, "an Example Object")?;
    validation::check_exclusive(
        fields.has("value"),
        fields.has("externalValue"),
        "value",
        "externalValue",
        fields.path(),
    )?;
    Ok(Example {
        summary: fields.str("summary")?,
        description: fields.str("description")?,
        value: fields.raw("value"),
        external_value: fields.str("externalValue")?,
    })
}

pub(crate) fn decode_link_at(value: &Value, path: &FieldPath) -> DecodeResult<Link> {
    let fields = Fields::new(value, path, "a Link Object")?;
    validation::check_exclusive(
        fields.has("operationRef"),
        fields.has("operationId"),
        "operationRef",
        "operationId",
        fields.path(),
    )?;
    Ok(Link {
        operation_ref: fields.str("operationRef")?,
        operation_id: fields.str("operationId")?,
        parameters: fields.map("parameters", |v, _| Ok(v.clone()))?,
        request_body: fields.raw("requestBody"),
        description: fields.str("description")?,
        server: fields.object("server", decode_server)?,
    })
}
