#![deny(missing_docs)]

//! # Value Synthesizer
//!
//! Produces a plausible JSON value for a schema node. Synthesis never fails:
//! shapes it cannot model degrade to filler values or to a tagged
//! placeholder for references it cannot follow.
//!
//! Randomness comes from the caller's rng, so a seeded `StdRng` makes the
//! output reproducible:
//!
//! ```
//! use dymock_core::mock::Synthesizer;
//! use dymock_core::oas::{RefOr, Schema, SchemaType};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let node = RefOr::T(Schema::of_type(SchemaType::Boolean));
//! let first = Synthesizer::default().synthesize(&node, &mut StdRng::seed_from_u64(7));
//! let again = Synthesizer::default().synthesize(&node, &mut StdRng::seed_from_u64(7));
//! assert_eq!(first, again);
//! ```

mod formats;

use crate::oas::models::{Components, OpenApiDocument};
use crate::oas::refs::{ComponentKind, RefOr, Reference};
use crate::oas::resolver::ComponentResolver;
use crate::oas::schema::{Schema, SchemaType};
use rand::distributions::Alphanumeric;
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::{json, Map, Value};
use tracing::trace;

/// Default nesting limit for objects, arrays and references.
pub const DEFAULT_MAX_DEPTH: usize = 10;

const DEFAULT_MAX_LENGTH: u64 = 50;
const LENGTH_CAP: u64 = 100;
const DEFAULT_MAXIMUM: i64 = 1000;
const MAX_ITEMS: usize = 5;

/// Tuning knobs for synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynthesisOptions {
    /// Past this depth arrays are emitted empty and references as
    /// placeholders; objects keep only their required properties.
    pub max_depth: usize,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Synthesizes values for schema nodes, following local schema references
/// when built with a Components table.
#[derive(Debug, Clone, Copy, Default)]
pub struct Synthesizer<'a> {
    resolver: ComponentResolver<'a>,
    options: SynthesisOptions,
}

impl<'a> Synthesizer<'a> {
    /// A synthesizer that resolves references against `components`.
    pub fn new(components: &'a Components) -> Self {
        Self {
            resolver: ComponentResolver::new(components),
            options: SynthesisOptions::default(),
        }
    }

    /// A synthesizer over the document's components.
    pub fn for_document(document: &'a OpenApiDocument) -> Self {
        Self {
            resolver: ComponentResolver::for_document(document),
            options: SynthesisOptions::default(),
        }
    }

    /// Replaces the options.
    pub fn with_options(mut self, options: SynthesisOptions) -> Self {
        self.options = options;
        self
    }

    /// The options in effect.
    pub fn options(&self) -> SynthesisOptions {
        self.options
    }

    /// Synthesizes a value for a `Schema | Reference` node.
    pub fn synthesize<R: Rng + ?Sized>(&self, node: &RefOr<Schema>, rng: &mut R) -> Value {
        let mut active = Vec::new();
        self.node(node, rng, 0, &mut active)
    }

    /// Synthesizes a value for an inline schema.
    pub fn synthesize_schema<R: Rng + ?Sized>(&self, schema: &Schema, rng: &mut R) -> Value {
        let mut active = Vec::new();
        self.schema(schema, rng, 0, &mut active)
    }

    fn node<R: Rng + ?Sized>(
        &self,
        node: &RefOr<Schema>,
        rng: &mut R,
        depth: usize,
        active: &mut Vec<String>,
    ) -> Value {
        match node {
            RefOr::T(schema) => self.schema(schema, rng, depth, active),
            RefOr::Ref(reference) => self.reference(reference, rng, depth, active),
        }
    }

    fn reference<R: Rng + ?Sized>(
        &self,
        reference: &Reference,
        rng: &mut R,
        depth: usize,
        active: &mut Vec<String>,
    ) -> Value {
        if depth >= self.options.max_depth {
            return placeholder(reference);
        }
        let Ok(resolved) = self.resolver.schema(reference) else {
            return placeholder(reference);
        };
        if active.iter().any(|name| name == resolved.name) {
            trace!(schema = resolved.name, "cycle reached, emitting placeholder");
            return placeholder(reference);
        }

        active.push(resolved.name.to_string());
        let value = self.schema(resolved.item, rng, depth, active);
        active.pop();
        value
    }

    fn schema<R: Rng + ?Sized>(
        &self,
        schema: &Schema,
        rng: &mut R,
        depth: usize,
        active: &mut Vec<String>,
    ) -> Value {
        if let Some(choice) = schema.enum_values.choose(rng) {
            return choice.clone();
        }

        match schema.schema_type {
            Some(SchemaType::String) => string_value(schema, rng),
            Some(SchemaType::Integer) => integer_value(schema, rng),
            Some(SchemaType::Number) => number_value(schema, rng),
            Some(SchemaType::Boolean) => Value::Bool(rng.gen_bool(0.5)),
            Some(SchemaType::Null) => Value::Null,
            Some(SchemaType::Object) => self.object(schema, rng, depth, active),
            Some(SchemaType::Array) => self.array(schema, rng, depth, active),
            None => self.untyped(schema, rng, depth, active),
        }
    }

    fn untyped<R: Rng + ?Sized>(
        &self,
        schema: &Schema,
        rng: &mut R,
        depth: usize,
        active: &mut Vec<String>,
    ) -> Value {
        if !schema.all_of.is_empty() || !schema.properties.is_empty() || !schema.required.is_empty() {
            return self.object(schema, rng, depth, active);
        }
        let members = if schema.one_of.is_empty() {
            &schema.any_of
        } else {
            &schema.one_of
        };
        if let Some(member) = members.choose(rng) {
            return self.node(member, rng, depth, active);
        }
        if schema.items.is_some() {
            return self.array(schema, rng, depth, active);
        }
        Value::String(formats::word(rng).to_string())
    }

    fn object<R: Rng + ?Sized>(
        &self,
        schema: &Schema,
        rng: &mut R,
        depth: usize,
        active: &mut Vec<String>,
    ) -> Value {
        // Past the depth limit only required properties are emitted, so the
        // object still satisfies its schema.
        let truncated = depth >= self.options.max_depth;

        let mut map = Map::new();
        for member in &schema.all_of {
            match self.node(member, rng, depth, active) {
                Value::Object(part) => map.extend(part),
                other if schema.schema_type.is_none() && schema.properties.is_empty() => {
                    // A composition of scalars; keep the first member's value.
                    if map.is_empty() {
                        return other;
                    }
                }
                _ => {}
            }
        }

        let optional: Vec<&str> = schema
            .properties
            .keys()
            .filter(|name| !schema.is_required(name))
            .map(String::as_str)
            .collect();
        let mut included: Vec<&str> = if truncated {
            Vec::new()
        } else {
            optional
                .iter()
                .copied()
                .filter(|_| rng.gen_bool(0.5))
                .collect()
        };
        let has_required = schema.properties.keys().any(|name| schema.is_required(name));
        if included.is_empty() && !has_required && !truncated {
            if let Some(forced) = optional.choose(rng) {
                included.push(*forced);
            }
        }

        for (name, property) in &schema.properties {
            if schema.is_required(name) || included.contains(&name.as_str()) {
                let value = self.node(property, rng, depth + 1, active);
                map.insert(name.clone(), value);
            }
        }
        for name in &schema.required {
            if !map.contains_key(name) {
                map.insert(name.clone(), Value::String(formats::word(rng).to_string()));
            }
        }
        Value::Object(map)
    }

    fn array<R: Rng + ?Sized>(
        &self,
        schema: &Schema,
        rng: &mut R,
        depth: usize,
        active: &mut Vec<String>,
    ) -> Value {
        let Some(items) = schema.items.as_deref() else {
            return Value::Array(Vec::new());
        };
        if depth >= self.options.max_depth {
            return Value::Array(Vec::new());
        }
        let len = rng.gen_range(1..=MAX_ITEMS);
        (0..len)
            .map(|_| self.node(items, rng, depth + 1, active))
            .collect()
    }
}

/// Synthesizes a value without a Components table: every reference becomes
/// a placeholder.
pub fn synthesize<R: Rng + ?Sized>(node: &RefOr<Schema>, rng: &mut R) -> Value {
    Synthesizer::default().synthesize(node, rng)
}

/// The tagged stand-in for a reference that was not expanded.
pub fn placeholder(reference: &Reference) -> Value {
    match reference.component() {
        Some((kind, _)) if kind != ComponentKind::Schemas => json!({
            "$ref": reference.target,
            "placeholder": true,
        }),
        _ => {
            let name = reference.name();
            json!({
                "$ref": name,
                "placeholder": true,
                "description": format!("Referenced schema: {}", name),
            })
        }
    }
}

/// True when `value` is a placeholder emitted for an unexpanded reference.
pub fn is_placeholder(value: &Value) -> bool {
    value.get("placeholder") == Some(&Value::Bool(true)) && value.get("$ref").is_some()
}

fn string_value<R: Rng + ?Sized>(schema: &Schema, rng: &mut R) -> Value {
    if let Some(value) = schema
        .format
        .as_deref()
        .and_then(|format| formats::format_value(format, rng))
    {
        return value;
    }

    let lower = schema
        .min_length
        .unwrap_or_else(|| schema.max_length.map_or(1, |max| max.min(1)));
    let upper = schema
        .max_length
        .unwrap_or(DEFAULT_MAX_LENGTH)
        .max(lower)
        .min(LENGTH_CAP);
    let lower = lower.min(upper);
    let len = rng.gen_range(lower..=upper);
    let text: String = (0..len)
        .map(|_| char::from(rng.sample(Alphanumeric)))
        .collect();
    Value::String(text)
}

/// Inverted bounds, including fractional bounds with no integer between
/// them (`0.5..0.7`), yield `ceil(minimum)`.
fn integer_value<R: Rng + ?Sized>(schema: &Schema, rng: &mut R) -> Value {
    let lower = schema.minimum.map_or(0, |min| min.ceil() as i64);
    let upper = schema.maximum.map_or(DEFAULT_MAXIMUM, |max| max.floor() as i64);
    if lower >= upper {
        if lower > upper {
            trace!(lower, upper, "no integer within bounds, using the minimum");
        }
        return json!(lower);
    }
    json!(rng.gen_range(lower..=upper))
}

fn number_value<R: Rng + ?Sized>(schema: &Schema, rng: &mut R) -> Value {
    let lower = schema.minimum.unwrap_or(0.0);
    let upper = schema.maximum.unwrap_or(DEFAULT_MAXIMUM as f64);
    if lower >= upper {
        return json!(lower);
    }
    if !(upper - lower).is_finite() {
        // The span overflows f64; step from the minimum in two halves.
        let half = rng.gen::<f64>() * (upper / 2.0 - lower / 2.0);
        return json!(lower + half + half);
    }
    json!(rng.gen_range(lower..=upper))
}
