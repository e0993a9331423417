#![deny(missing_docs)]

//! # Schema Decoding
//!
//! Decodes Schema Objects. Properties, items, composition members and
//! `additionalProperties` are each sniffed for `$ref` again, at every level.

use crate::error::DecodeResult;
use crate::oas::decoder::{ref_or, Fields, FieldPath};
use crate::oas::refs::RefOr;
use crate::oas::schema::{AdditionalProperties, Discriminator, Schema, SchemaType};
use serde_json::Value;

/// Decodes a `Schema | Reference` slot rooted at the empty path.
pub fn decode_schema(raw: &Value) -> DecodeResult<RefOr<Schema>> {
    decode_schema_at(raw, &FieldPath::root())
}

pub(crate) fn decode_schema_at(value: &Value, path: &FieldPath) -> DecodeResult<RefOr<Schema>> {
    ref_or(value, path, decode_inline_schema)
}

fn decode_inline_schema(value: &Value, path: &FieldPath) -> DecodeResult<Schema> {
    let fields = Fields::new(value, path, "a Schema Object")?;
    let (schema_type, list_nullable) = decode_type(&fields)?;

    let items = fields
        .object("items", decode_schema_at)?
        .map(Box::new);

    let additional_properties = match fields.get("additionalProperties") {
        None => None,
        Some(Value::Bool(allowed)) => Some(AdditionalProperties::Allowed(*allowed)),
        Some(other @ Value::Object(_)) => Some(AdditionalProperties::Schema(Box::new(
            decode_schema_at(other, &fields.at("additionalProperties"))?,
        ))),
        Some(_) => {
            return Err(fields
                .at("additionalProperties")
                .error("a boolean or a Schema Object"))
        }
    };

    let enum_values = match fields.get("enum") {
        None => Vec::new(),
        Some(Value::Array(values)) => values.clone(),
        Some(_) => return Err(fields.at("enum").error("a list of literals")),
    };

    Ok(Schema {
        schema_type,
        nullable: list_nullable || fields.flag("nullable")?,
        title: fields.str("title")?,
        description: fields.str("description")?,
        format: fields.str("format")?,
        pattern: fields.str("pattern")?,
        min_length: fields.u64("minLength")?,
        max_length: fields.u64("maxLength")?,
        minimum: fields.f64("minimum")?,
        maximum: fields.f64("maximum")?,
        properties: fields.map("properties", decode_schema_at)?,
        required: fields.strings("required")?.into_iter().collect(),
        items,
        all_of: fields.list("allOf", decode_schema_at)?,
        any_of: fields.list("anyOf", decode_schema_at)?,
        one_of: fields.list("oneOf", decode_schema_at)?,
        enum_values,
        default: fields.raw("default"),
        example: fields.raw("example"),
        additional_properties,
        read_only: fields.flag("readOnly")?,
        write_only: fields.flag("writeOnly")?,
        deprecated: fields.flag("deprecated")?,
        discriminator: fields.object("discriminator", decode_discriminator)?,
        extensions: fields.extensions(),
    })
}

/// Reads `type` as a single name or a 3.1 list like `["string", "null"]`.
fn decode_type(fields: &Fields<'_>) -> DecodeResult<(Option<SchemaType>, bool)> {
    const EXPECTED: &str = "one of string, integer, number, boolean, object, array, null";
    let path = fields.at("type");
    match fields.get("type") {
        None => Ok((None, false)),
        Some(Value::String(name)) => SchemaType::parse(name)
            .map(|t| (Some(t), false))
            .ok_or_else(|| path.error(format!("{}, found '{}'", EXPECTED, name))),
        Some(Value::Array(names)) => {
            let mut nullable = false;
            let mut declared = None;
            for (i, name) in names.iter().enumerate() {
                let parsed = name
                    .as_str()
                    .and_then(SchemaType::parse)
                    .ok_or_else(|| path.child(i).error(EXPECTED))?;
                match parsed {
                    SchemaType::Null => nullable = true,
                    other if declared.is_none() => declared = Some(other),
                    _ => {
                        return Err(path.error("a single type, optionally combined with 'null'"))
                    }
                }
            }
            if declared.is_none() && nullable {
                return Ok((Some(SchemaType::Null), false));
            }
            Ok((declared, nullable))
        }
        Some(_) => Err(path.error(EXPECTED)),
    }
}

fn decode_discriminator(value: &Value, path: &FieldPath) -> DecodeResult<Discriminator> {
    let fields = Fields::new(value, path, "a Discriminator Object")?;
    let mapping = fields.map("mapping", |v, p| {
        v.as_str()
            .map(str::to_string)
            .ok_or_else(|| p.error("a schema name or reference"))
    })?;
    Ok(Discriminator {
        property_name: fields.required_str("propertyName")?,
        mapping,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn inline(raw: Value) -> Schema {
        match decode_schema(&raw).unwrap() {
            RefOr::T(schema) => schema,
            RefOr::Ref(r) => panic!("expected inline schema, got reference {}", r),
        }
    }

    #[test]
    fn test_decode_schema_basic_types() {
        let schema = inline(json!({"type": "string", "format": "date-time"}));
        assert_eq!(schema.schema_type, Some(SchemaType::String));
        assert_eq!(schema.format.as_deref(), Some("date-time"));
    }

    #[test]
    fn test_decode_schema_with_ref() {
        let decoded = decode_schema(&json!({"$ref": "#/components/schemas/Pet"})).unwrap();
        let reference = decoded.as_reference().expect("a reference");
        assert_eq!(reference.target, "#/components/schemas/Pet");
    }

    #[test]
    fn test_decode_schema_object_with_properties() {
        let schema = inline(json!({
            "type": "object",
            "properties": {
                "id": {"type": "integer"},
                "owner": {"$ref": "#/components/schemas/User"},
                "name": {"type": "string", "x-label": "Name"}
            },
            "required": ["id", "id"]
        }));
        let keys: Vec<_> = schema.properties.keys().cloned().collect();
        assert_eq!(keys, vec!["id", "owner", "name"]);
        assert!(schema.properties["owner"].is_reference());
        let name = schema.properties["name"].as_item().unwrap();
        assert_eq!(name.extensions["x-label"], json!("Name"));
        assert_eq!(schema.required.len(), 1);
        assert!(schema.is_required("id"));
    }

    #[test]
    fn test_x_prefixed_property_names_are_kept() {
        let schema = inline(json!({
            "type": "object",
            "required": ["x-id"],
            "properties": {
                "x-id": {"type": "integer"},
                "name": {"type": "string"}
            }
        }));
        let keys: Vec<_> = schema.properties.keys().cloned().collect();
        assert_eq!(keys, vec!["x-id", "name"]);
        let id = schema.properties["x-id"].as_item().unwrap();
        assert_eq!(id.schema_type, Some(SchemaType::Integer));
    }

    #[test]
    fn test_decode_nested_items_and_composition() {
        let schema = inline(json!({
            "type": "array",
            "items": {
                "oneOf": [
                    {"$ref": "#/components/schemas/Cat"},
                    {"type": "object", "properties": {"bark": {"type": "boolean"}}}
                ]
            }
        }));
        let items = schema.items.as_deref().unwrap().as_item().unwrap();
        assert_eq!(items.one_of.len(), 2);
        assert!(items.one_of[0].is_reference());
        assert!(items.one_of[1].as_item().unwrap().properties.contains_key("bark"));
    }

    #[test]
    fn test_decode_type_list_with_null() {
        let schema = inline(json!({"type": ["integer", "null"]}));
        assert_eq!(schema.schema_type, Some(SchemaType::Integer));
        assert!(schema.nullable);

        let only_null = inline(json!({"type": ["null"]}));
        assert_eq!(only_null.schema_type, Some(SchemaType::Null));
    }

    #[test]
    fn test_decode_type_list_with_two_types_fails() {
        let err = decode_schema(&json!({"type": ["integer", "string"]})).unwrap_err();
        assert_eq!(err.path, "type");
    }

    #[test]
    fn test_unknown_type_fails_with_path() {
        let err = decode_schema(&json!({
            "type": "object",
            "properties": {"file": {"type": "file"}}
        }))
        .unwrap_err();
        assert_eq!(err.path, "properties.file.type");
        assert!(err.expected.contains("found 'file'"));
    }

    #[test]
    fn test_additional_properties_variants() {
        let flag = inline(json!({"type": "object", "additionalProperties": false}));
        assert_eq!(flag.additional_properties, Some(AdditionalProperties::Allowed(false)));

        let typed = inline(json!({"type": "object", "additionalProperties": {"type": "string"}}));
        assert!(matches!(typed.additional_properties, Some(AdditionalProperties::Schema(_))));

        assert!(decode_schema(&json!({"additionalProperties": "yes"})).is_err());
    }

    #[test]
    fn test_bounds_enum_and_discriminator() {
        let schema = inline(json!({
            "type": "string",
            "minLength": 2,
            "maxLength": 8,
            "enum": ["a", "b"],
            "nullable": true,
            "discriminator": {"propertyName": "kind", "mapping": {"cat": "#/components/schemas/Cat"}}
        }));
        assert_eq!(schema.min_length, Some(2));
        assert_eq!(schema.max_length, Some(8));
        assert_eq!(schema.enum_values, vec![json!("a"), json!("b")]);
        assert!(schema.nullable);
        assert_eq!(schema.discriminator.unwrap().mapping["cat"], "#/components/schemas/Cat");
    }

    #[test]
    fn test_negative_min_length_fails() {
        let err = decode_schema(&json!({"type": "string", "minLength": -1})).unwrap_err();
        assert_eq!(err.path, "minLength");
    }
}
