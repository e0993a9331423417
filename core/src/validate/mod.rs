#![deny(missing_docs)]

//! # Payload Validator
//!
//! Checks a JSON value against a schema node and reports the first
//! violation with a JSON-pointer-like path (`$`, `$.tags[1]`, `$.owner.name`).
//!
//! Two modes:
//! - [`ValidationMode::Lenient`] checks kind (object, array, string, integer,
//!   boolean), required properties and array items, in that order.
//! - [`ValidationMode::Strict`] adds number/null kinds, enum membership,
//!   length and numeric bounds, composition and declared properties.
//!
//! Neither mode enforces `pattern` or `format`. References that cannot be
//! followed are accepted, and so is a synthesizer placeholder standing in
//! for a reference (see [`crate::mock::is_placeholder`]).

use crate::mock::is_placeholder;
use crate::oas::models::{Components, OpenApiDocument};
use crate::oas::refs::RefOr;
use crate::oas::resolver::ComponentResolver;
use crate::oas::schema::{Schema, SchemaType};
use serde_json::Value;
use std::fmt;
use tracing::trace;

/// How much of the schema the validator enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Kind, required properties and array items only.
    #[default]
    Lenient,
    /// Every supported keyword.
    Strict,
}

/// A value that does not satisfy its schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// What is wrong.
    pub reason: String,
    /// Where in the value, e.g. `$.tags[1]`.
    pub path: String,
}

impl ValidationError {
    fn new(path: &ValuePath, reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            path: path.0.clone(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)
    }
}

impl std::error::Error for ValidationError {}

/// Result of validating one value.
pub type ValidationResult = Result<(), ValidationError>;

#[derive(Debug, Clone)]
struct ValuePath(String);

impl ValuePath {
    fn root() -> Self {
        Self("$".to_string())
    }

    fn key(&self, name: &str) -> Self {
        Self(format!("{}.{}", self.0, name))
    }

    fn index(&self, i: usize) -> Self {
        Self(format!("{}[{}]", self.0, i))
    }
}

/// Validates values against schema nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator<'a> {
    resolver: ComponentResolver<'a>,
    mode: ValidationMode,
}

impl<'a> Validator<'a> {
    /// A validator that follows references into `components`.
    pub fn new(components: &'a Components) -> Self {
        Self {
            resolver: ComponentResolver::new(components),
            mode: ValidationMode::default(),
        }
    }

    /// A validator over the document's components.
    pub fn for_document(document: &'a OpenApiDocument) -> Self {
        Self {
            resolver: ComponentResolver::for_document(document),
            mode: ValidationMode::default(),
        }
    }

    /// Switches the mode.
    pub fn with_mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    /// The mode in effect.
    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    /// Validates `value` against a `Schema | Reference` node.
    pub fn validate(&self, value: &Value, node: &RefOr<Schema>) -> ValidationResult {
        let mut active = Vec::new();
        self.node(value, node, &ValuePath::root(), &mut active)
    }

    /// Validates `value` against an inline schema.
    pub fn validate_schema(&self, value: &Value, schema: &Schema) -> ValidationResult {
        let mut active = Vec::new();
        self.schema(value, schema, &ValuePath::root(), &mut active)
    }

    fn node(
        &self,
        value: &Value,
        node: &RefOr<Schema>,
        path: &ValuePath,
        active: &mut Vec<(String, String)>,
    ) -> ValidationResult {
        let reference = match node {
            RefOr::T(schema) => return self.schema(value, schema, path, active),
            RefOr::Ref(reference) => reference,
        };
        if is_placeholder(value) {
            return Ok(());
        }
        let Ok(resolved) = self.resolver.schema(reference) else {
            return Ok(());
        };
        // The same schema at the same spot in the value means a loop that
        // consumes nothing.
        let key = (resolved.name.to_string(), path.0.clone());
        if active.contains(&key) {
            trace!(schema = resolved.name, path = %path.0, "cycle reached, accepting");
            return Ok(());
        }
        active.push(key);
        let result = self.schema(value, resolved.item, path, active);
        active.pop();
        result
    }

    fn schema(
        &self,
        value: &Value,
        schema: &Schema,
        path: &ValuePath,
        active: &mut Vec<(String, String)>,
    ) -> ValidationResult {
        if value.is_null() && schema.nullable {
            return Ok(());
        }
        let strict = self.mode == ValidationMode::Strict;

        if let Some(expected) = schema.schema_type {
            if !kind_matches(expected, value, strict) {
                return Err(ValidationError::new(
                    path,
                    format!(
                        "expected {}, found {}",
                        expected,
                        SchemaType::of_value(value)
                    ),
                ));
            }
        }

        if strict && !schema.enum_values.is_empty() && !schema.enum_values.contains(value) {
            return Err(ValidationError::new(
                path,
                "value is not one of the enumerated values",
            ));
        }

        if let Value::Object(object) = value {
            if let Some(missing) = schema.required.iter().find(|name| !object.contains_key(*name)) {
                return Err(ValidationError::new(
                    path,
                    format!("missing required property '{}'", missing),
                ));
            }
        }

        if let (Some(items), Value::Array(elements)) = (schema.items.as_deref(), value) {
            for (i, element) in elements.iter().enumerate() {
                self.node(element, items, &path.index(i), active)?;
            }
        }

        if !strict {
            return Ok(());
        }

        if let Value::Object(object) = value {
            for (name, property) in &schema.properties {
                if let Some(field) = object.get(name) {
                    self.node(field, property, &path.key(name), active)?;
                }
            }
        }
        check_bounds(value, schema, path)?;
        self.check_composition(value, schema, path, active)
    }

    fn check_composition(
        &self,
        value: &Value,
        schema: &Schema,
        path: &ValuePath,
        active: &mut Vec<(String, String)>,
    ) -> ValidationResult {
        for member in &schema.all_of {
            self.node(value, member, path, active)?;
        }

        if !schema.any_of.is_empty()
            && !schema
                .any_of
                .iter()
                .any(|member| self.node(value, member, path, active).is_ok())
        {
            return Err(ValidationError::new(
                path,
                "value matches none of the anyOf schemas",
            ));
        }

        if !schema.one_of.is_empty() {
            let matches = schema
                .one_of
                .iter()
                .filter(|member| self.node(value, member, path, active).is_ok())
                .count();
            if matches != 1 {
                return Err(ValidationError::new(
                    path,
                    format!(
                        "value matches {} of the oneOf schemas, expected exactly one",
                        matches
                    ),
                ));
            }
        }
        Ok(())
    }
}

/// Validates in lenient mode without following references.
pub fn validate(value: &Value, node: &RefOr<Schema>) -> ValidationResult {
    Validator::default().validate(value, node)
}

fn kind_matches(expected: SchemaType, value: &Value, strict: bool) -> bool {
    match expected {
        SchemaType::Object => value.is_object(),
        SchemaType::Array => value.is_array(),
        SchemaType::String => value.is_string(),
        SchemaType::Integer => value.is_i64() || value.is_u64(),
        SchemaType::Boolean => value.is_boolean(),
        SchemaType::Number => !strict || value.is_number(),
        SchemaType::Null => !strict || value.is_null(),
    }
}

fn check_bounds(value: &Value, schema: &Schema, path: &ValuePath) -> ValidationResult {
    if let Value::String(text) = value {
        let len = text.chars().count() as u64;
        if let Some(min) = schema.min_length.filter(|min| len < *min) {
            return Err(ValidationError::new(
                path,
                format!("string is shorter than minLength {}", min),
            ));
        }
        if let Some(max) = schema.max_length.filter(|max| len > *max) {
            return Err(ValidationError::new(
                path,
                format!("string is longer than maxLength {}", max),
            ));
        }
    }

    if let Some(number) = value.as_f64() {
        if let Some(min) = schema.minimum.filter(|min| number < *min) {
            return Err(ValidationError::new(
                path,
                format!("{} is less than minimum {}", number, min),
            ));
        }
        if let Some(max) = schema.maximum.filter(|max| number > *max) {
            return Err(ValidationError::new(
                path,
                format!("{} is greater than maximum {}", number, max),
            ));
        }
    }
    Ok(())
}
