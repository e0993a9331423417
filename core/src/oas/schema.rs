#![deny(missing_docs)]

//! # Schema Graph
//!
//! The Schema Object as a typed node. Every nested schema position
//! (properties, items, composition members, `additionalProperties`) holds a
//! `RefOr<Schema>`, so a reference can appear at any depth.

use crate::oas::models::Extensions;
use crate::oas::refs::RefOr;
use indexmap::{IndexMap, IndexSet};
use serde_json::Value;
use std::fmt;

/// The JSON type named by a schema's `type` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaType {
    /// `string`
    String,
    /// `integer`
    Integer,
    /// `number`
    Number,
    /// `boolean`
    Boolean,
    /// `object`
    Object,
    /// `array`
    Array,
    /// `null`
    Null,
}

impl SchemaType {
    /// Parses a `type` name. Unknown names (e.g. Swagger 2 `file`) yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            "object" => Some(Self::Object),
            "array" => Some(Self::Array),
            "null" => Some(Self::Null),
            _ => None,
        }
    }

    /// The keyword as written in a document.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
            Self::Null => "null",
        }
    }

    /// The type of a concrete JSON value. Integral numbers report `Integer`.
    pub fn of_value(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(n) if n.is_i64() || n.is_u64() => Self::Integer,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `additionalProperties`: a flag or a schema for the extra values.
#[derive(Debug, Clone, PartialEq)]
pub enum AdditionalProperties {
    /// `true` / `false`.
    Allowed(bool),
    /// Extra properties must match this schema.
    Schema(Box<RefOr<Schema>>),
}

/// Polymorphism hint for `oneOf` / `anyOf`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Discriminator {
    /// Property whose value selects the variant.
    pub property_name: String,
    /// Property value to schema name or reference.
    pub mapping: IndexMap<String, String>,
}

/// A Schema Object.
///
/// All fields are optional; an empty schema accepts anything.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    /// Declared `type`, if any.
    pub schema_type: Option<SchemaType>,
    /// `nullable: true`, or a 3.1 type list containing `null`.
    pub nullable: bool,
    /// Short title.
    pub title: Option<String>,
    /// Long description.
    pub description: Option<String>,
    /// Format hint (`date-time`, `uuid`, ...).
    pub format: Option<String>,
    /// Regex the string should match.
    pub pattern: Option<String>,
    /// Lower bound on string length.
    pub min_length: Option<u64>,
    /// Upper bound on string length.
    pub max_length: Option<u64>,
    /// Lower numeric bound.
    pub minimum: Option<f64>,
    /// Upper numeric bound.
    pub maximum: Option<f64>,
    /// Object properties in declaration order.
    pub properties: IndexMap<String, RefOr<Schema>>,
    /// Names of the required properties.
    pub required: IndexSet<String>,
    /// Element schema of an array.
    pub items: Option<Box<RefOr<Schema>>>,
    /// `allOf` members.
    pub all_of: Vec<RefOr<Schema>>,
    /// `anyOf` members.
    pub any_of: Vec<RefOr<Schema>>,
    /// `oneOf` members.
    pub one_of: Vec<RefOr<Schema>>,
    /// Allowed literals, in order.
    pub enum_values: Vec<Value>,
    /// `default` literal.
    pub default: Option<Value>,
    /// `example` literal.
    pub example: Option<Value>,
    /// `additionalProperties`.
    pub additional_properties: Option<AdditionalProperties>,
    /// `readOnly`.
    pub read_only: bool,
    /// `writeOnly`.
    pub write_only: bool,
    /// `deprecated`.
    pub deprecated: bool,
    /// `discriminator`.
    pub discriminator: Option<Discriminator>,
    /// `x-` keys.
    pub extensions: Extensions,
}

impl Schema {
    /// A bare schema of the given type.
    pub fn of_type(schema_type: SchemaType) -> Self {
        Self {
            schema_type: Some(schema_type),
            ..Self::default()
        }
    }

    /// Whether `name` is listed in `required`.
    pub fn is_required(&self, name: &str) -> bool {
        self.required.contains(name)
    }

    /// Whether the schema composes others via `allOf`, `anyOf` or `oneOf`.
    pub fn is_composite(&self) -> bool {
        !(self.all_of.is_empty() && self.any_of.is_empty() && self.one_of.is_empty())
    }
}
