#![deny(missing_docs)]

//! # Document Decoder
//!
//! Recursive descent from an untyped tree (`serde_json::Value`) to the typed
//! graph, with one routine per entity kind.
//!
//! - Every `Reference | T` slot is resolved once, here, by checking for the
//!   `$ref` key.
//! - `x-` keys are collected into the entity's extensions bag.
//! - Decoding is all-or-nothing: the first malformed node aborts the parse
//!   with a [`StructuralError`] naming its dotted field path.

mod components;
mod paths;
mod schema;

pub use components::decode_components;
pub use paths::{
    decode_header, decode_media_type, decode_operation, decode_parameter, decode_path_item,
    decode_request_body, decode_response,
};
pub use schema::decode_schema;

use crate::error::{DecodeResult, StructuralError};
use crate::oas::models::{
    Contact, Extensions, ExternalDocs, Info, License, OpenApiDocument, PathItem,
    SecurityRequirement, Server, ServerVariable, Tag,
};
use crate::oas::refs::{RefOr, Reference};
use crate::oas::validation;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::fmt;
use tracing::{debug, info};

/// Prefix reserved for vendor extensions.
pub const EXTENSION_PREFIX: &str = "x-";

const REF_KEY: &str = "$ref";

/// Decodes a whole OpenAPI 3.x document.
///
/// Fails when `openapi` is missing or not `3.x`, when `info` lacks its title
/// or version, when `paths` is missing, empty or not a mapping, or when any
/// nested entity breaks its own field contract.
pub fn decode(raw: &Value) -> DecodeResult<OpenApiDocument> {
    let root = FieldPath::root();
    let fields = Fields::new(raw, &root, "an OpenAPI document")?;

    let openapi = fields
        .scalar_text("openapi")?
        .ok_or_else(|| fields.at("openapi").error("an OpenAPI version string (required)"))?;
    validation::check_openapi_version(&openapi, &fields.at("openapi"))?;

    let info = decode_info(fields.required("info", "an Info Object")?, &fields.at("info"))?;

    let (paths, paths_extensions) =
        decode_paths(fields.required("paths", "a Paths Object")?, &fields.at("paths"))?;

    let webhooks = fields.map_with_key("webhooks", |name, value, path| {
        ref_or(value, path, |v, p| paths::decode_path_item_at(v, p, name))
    })?;

    let document = OpenApiDocument {
        openapi,
        info,
        json_schema_dialect: fields.str("jsonSchemaDialect")?,
        servers: fields.list("servers", decode_server)?,
        paths,
        paths_extensions,
        webhooks,
        components: fields.object("components", components::decode_components_at)?,
        security: fields.list("security", decode_security_requirement)?,
        tags: fields.list("tags", decode_tag)?,
        external_docs: fields.object("externalDocs", decode_external_docs)?,
        extensions: fields.extensions(),
    };

    info!(
        title = %document.info.title,
        version = %document.openapi,
        paths = document.paths.len(),
        operations = document.operations().count(),
        "decoded OpenAPI document"
    );
    Ok(document)
}

fn decode_paths(value: &Value, path: &FieldPath) -> DecodeResult<(IndexMap<String, PathItem>, Extensions)> {
    let map = value
        .as_object()
        .ok_or_else(|| path.error("a mapping of path templates to Path Items"))?;

    let mut items = IndexMap::new();
    let mut extensions = Extensions::new();
    for (key, item) in map {
        if key.starts_with(EXTENSION_PREFIX) {
            extensions.insert(key.clone(), item.clone());
            continue;
        }
        let item_path = path.child(key);
        validation::check_path_template(key, &item_path)?;
        let decoded = paths::decode_path_item_at(item, &item_path, key)?;
        debug!(path = %key, operations = decoded.operations().count(), "decoded path item");
        items.insert(key.clone(), decoded);
    }

    validation::check_paths_non_empty(&items, path)?;
    Ok((items, extensions))
}

fn decode_info(value: &Value, path: &FieldPath) -> DecodeResult<Info> {
    let fields = Fields::new(value, path, "an Info Object")?;
    Ok(Info {
        title: fields.required_str("title")?,
        version: fields
            .scalar_text("version")?
            .ok_or_else(|| fields.at("version").error("a string (required)"))?,
        summary: fields.str("summary")?,
        description: fields.str("description")?,
        terms_of_service: fields.str("termsOfService")?,
        contact: fields.object("contact", decode_contact)?,
        license: fields.object("license", decode_license)?,
        extensions: fields.extensions(),
    })
}

fn decode_contact(value: &Value, path: &FieldPath) -> DecodeResult<Contact> {
    let fields = Fields::new(value, path, "a Contact Object")?;
    Ok(Contact {
        name: fields.str("name")?,
        url: fields.str("url")?,
        email: fields.str("email")?,
    })
}

fn decode_license(value: &Value, path: &FieldPath) -> DecodeResult<License> {
    let fields = Fields::new(value, path, "a License Object")?;
    Ok(License {
        name: fields.required_str("name")?,
        identifier: fields.str("identifier")?,
        url: fields.str("url")?,
    })
}

pub(crate) fn decode_server(value: &Value, path: &FieldPath) -> DecodeResult<Server> {
    let fields = Fields::new(value, path, "a Server Object")?;
    Ok(Server {
        url: fields.required_str("url")?,
        description: fields.str("description")?,
        variables: fields.map("variables", decode_server_variable)?,
    })
}

fn decode_server_variable(value: &Value, path: &FieldPath) -> DecodeResult<ServerVariable> {
    let fields = Fields::new(value, path, "a Server Variable Object")?;
    Ok(ServerVariable {
        default: fields.required_str("default")?,
        enum_values: fields.strings("enum")?,
        description: fields.str("description")?,
    })
}

fn decode_tag(value: &Value, path: &FieldPath) -> DecodeResult<Tag> {
    let fields = Fields::new(value, path, "a Tag Object")?;
    Ok(Tag {
        name: fields.required_str("name")?,
        description: fields.str("description")?,
        external_docs: fields.object("externalDocs", decode_external_docs)?,
    })
}

pub(crate) fn decode_external_docs(value: &Value, path: &FieldPath) -> DecodeResult<ExternalDocs> {
    let fields = Fields::new(value, path, "an External Documentation Object")?;
    Ok(ExternalDocs {
        url: fields.required_str("url")?,
        description: fields.str("description")?,
    })
}

pub(crate) fn decode_security_requirement(
    value: &Value,
    path: &FieldPath,
) -> DecodeResult<SecurityRequirement> {
    let fields = Fields::new(value, path, "a Security Requirement Object")?;
    let mut requirement = SecurityRequirement::new();
    for key in fields.map.keys() {
        requirement.insert(key.clone(), fields.strings(key)?);
    }
    Ok(requirement)
}

/// Decodes a `Reference | T` slot: the `$ref` key selects the reference.
pub(crate) fn ref_or<T>(
    value: &Value,
    path: &FieldPath,
    decode_inline: impl Fn(&Value, &FieldPath) -> DecodeResult<T>,
) -> DecodeResult<RefOr<T>> {
    if let Some(map) = value.as_object() {
        if let Some(target) = map.get(REF_KEY) {
            let target = target
                .as_str()
                .ok_or_else(|| path.child(REF_KEY).error("a reference string"))?;
            let fields = Fields::new(value, path, "a Reference Object")?;
            return Ok(RefOr::Ref(Reference {
                target: target.to_string(),
                summary: fields.str("summary")?,
                description: fields.str("description")?,
            }));
        }
    }
    decode_inline(value, path).map(RefOr::T)
}

/// Dotted location of a node inside the document, e.g. `paths./pets.get`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FieldPath(String);

impl FieldPath {
    pub(crate) fn root() -> Self {
        Self::default()
    }

    pub(crate) fn child(&self, key: impl fmt::Display) -> Self {
        if self.0.is_empty() {
            Self(key.to_string())
        } else {
            Self(format!("{}.{}", self.0, key))
        }
    }

    pub(crate) fn error(&self, expected: impl Into<String>) -> StructuralError {
        StructuralError::new(self.0.clone(), expected)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Typed accessors over one mapping node, reporting errors at its path.
///
/// An explicit `null` reads as an absent optional field.
pub(crate) struct Fields<'a> {
    map: &'a Map<String, Value>,
    path: FieldPath,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(value: &'a Value, path: &FieldPath, entity: &str) -> DecodeResult<Self> {
        let map = value
            .as_object()
            .ok_or_else(|| path.error(format!("{} (a mapping)", entity)))?;
        Ok(Self {
            map,
            path: path.clone(),
        })
    }

    pub(crate) fn path(&self) -> &FieldPath {
        &self.path
    }

    pub(crate) fn at(&self, key: &str) -> FieldPath {
        self.path.child(key)
    }

    pub(crate) fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    pub(crate) fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub(crate) fn required(&self, key: &str, shape: &str) -> DecodeResult<&'a Value> {
        self.get(key)
            .ok_or_else(|| self.at(key).error(format!("{} (required)", shape)))
    }

    pub(crate) fn required_str(&self, key: &str) -> DecodeResult<String> {
        self.str(key)?
            .ok_or_else(|| self.at(key).error("a string (required)"))
    }

    pub(crate) fn str(&self, key: &str) -> DecodeResult<Option<String>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(self.at(key).error("a string")),
        }
    }

    /// Like [`Fields::str`], but keeps the text of a number (YAML `version: 1.0`).
    pub(crate) fn scalar_text(&self, key: &str) -> DecodeResult<Option<String>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(_) => Err(self.at(key).error("a string")),
        }
    }

    pub(crate) fn bool(&self, key: &str) -> DecodeResult<Option<bool>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(_) => Err(self.at(key).error("a boolean")),
        }
    }

    pub(crate) fn flag(&self, key: &str) -> DecodeResult<bool> {
        Ok(self.bool(key)?.unwrap_or(false))
    }

    pub(crate) fn u64(&self, key: &str) -> DecodeResult<Option<u64>> {
        match self.get(key) {
            None => Ok(None),
            Some(v) => v
                .as_u64()
                .map(Some)
                .ok_or_else(|| self.at(key).error("a non-negative integer")),
        }
    }

    pub(crate) fn f64(&self, key: &str) -> DecodeResult<Option<f64>> {
        match self.get(key) {
            None => Ok(None),
            Some(v) => v
                .as_f64()
                .map(Some)
                .ok_or_else(|| self.at(key).error("a number")),
        }
    }

    pub(crate) fn strings(&self, key: &str) -> DecodeResult<Vec<String>> {
        let Some(value) = self.get(key) else {
            return Ok(Vec::new());
        };
        let items = value
            .as_array()
            .ok_or_else(|| self.at(key).error("a list of strings"))?;
        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| self.at(key).child(i).error("a string"))
            })
            .collect()
    }

    /// The raw value, cloned verbatim.
    pub(crate) fn raw(&self, key: &str) -> Option<Value> {
        self.get(key).cloned()
    }

    pub(crate) fn object<T>(
        &self,
        key: &str,
        decode: impl Fn(&Value, &FieldPath) -> DecodeResult<T>,
    ) -> DecodeResult<Option<T>> {
        self.get(key)
            .map(|value| decode(value, &self.at(key)))
            .transpose()
    }

    pub(crate) fn list<T>(
        &self,
        key: &str,
        decode: impl Fn(&Value, &FieldPath) -> DecodeResult<T>,
    ) -> DecodeResult<Vec<T>> {
        let Some(value) = self.get(key) else {
            return Ok(Vec::new());
        };
        let path = self.at(key);
        let items = value.as_array().ok_or_else(|| path.error("a list"))?;
        items
            .iter()
            .enumerate()
            .map(|(i, item)| decode(item, &path.child(i)))
            .collect()
    }

    /// Decodes every entry of a mapping field. Keys are data here, so `x-`
    /// names are kept.
    pub(crate) fn map<T>(
        &self,
        key: &str,
        decode: impl Fn(&Value, &FieldPath) -> DecodeResult<T>,
    ) -> DecodeResult<IndexMap<String, T>> {
        self.entries(key, false, |_, value, path| decode(value, path))
    }

    /// Like [`Fields::map`], handing each entry's key to `decode`.
    pub(crate) fn map_with_key<T>(
        &self,
        key: &str,
        decode: impl Fn(&str, &Value, &FieldPath) -> DecodeResult<T>,
    ) -> DecodeResult<IndexMap<String, T>> {
        self.entries(key, false, decode)
    }

    /// Decodes a mapping object that may carry its own extensions
    /// (e.g. Responses), skipping the `x-` keys.
    pub(crate) fn extensible_map<T>(
        &self,
        key: &str,
        decode: impl Fn(&Value, &FieldPath) -> DecodeResult<T>,
    ) -> DecodeResult<IndexMap<String, T>> {
        self.entries(key, true, |_, value, path| decode(value, path))
    }

    fn entries<T>(
        &self,
        key: &str,
        skip_extensions: bool,
        decode: impl Fn(&str, &Value, &FieldPath) -> DecodeResult<T>,
    ) -> DecodeResult<IndexMap<String, T>> {
        let Some(value) = self.get(key) else {
            return Ok(IndexMap::new());
        };
        let path = self.at(key);
        let entries = value.as_object().ok_or_else(|| path.error("a mapping"))?;
        let mut out = IndexMap::with_capacity(entries.len());
        for (name, entry) in entries {
            if skip_extensions && name.starts_with(EXTENSION_PREFIX) {
                continue;
            }
            out.insert(name.clone(), decode(name, entry, &path.child(name))?);
        }
        Ok(out)
    }

    /// Collects the `x-` keys of this node verbatim.
    pub(crate) fn extensions(&self) -> Extensions {
        self.map
            .iter()
            .filter(|(key, _)| key.starts_with(EXTENSION_PREFIX))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}
