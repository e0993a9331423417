#![deny(missing_docs)]

//! # Components Decoding
//!
//! The ten `components` sections and security schemes.

use crate::error::DecodeResult;
use crate::oas::decoder::paths::{
    decode_callback_at, decode_example_at, decode_header_at, decode_link_at, decode_parameter_at,
    decode_path_item_at, decode_request_body_at, decode_response_at,
};
use crate::oas::decoder::schema::decode_schema_at;
use crate::oas::decoder::{ref_or, Fields, FieldPath};
use crate::oas::models::{
    Components, OAuthFlow, ParameterLocation, SecurityScheme, SecuritySchemeKind,
};
use serde_json::Value;
use tracing::debug;

/// Decodes a Components Object rooted at the empty path.
pub fn decode_components(raw: &Value) -> DecodeResult<Components> {
    decode_components_at(raw, &FieldPath::root())
}

pub(crate) fn decode_components_at(value: &Value, path: &FieldPath) -> DecodeResult<Components> {
    let fields = Fields::new(value, path, "a Components Object")?;
    let components = Components {
        schemas: fields.map("schemas", decode_schema_at)?,
        responses: fields.map("responses", |v, p| ref_or(v, p, decode_response_at))?,
        parameters: fields.map("parameters", |v, p| ref_or(v, p, decode_parameter_at))?,
        examples: fields.map("examples", |v, p| ref_or(v, p, decode_example_at))?,
        request_bodies: fields.map("requestBodies", |v, p| ref_or(v, p, decode_request_body_at))?,
        headers: fields.map("headers", |v, p| ref_or(v, p, decode_header_at))?,
        security_schemes: fields.map("securitySchemes", |v, p| {
            ref_or(v, p, decode_security_scheme_at)
        })?,
        links: fields.map("links", |v, p| ref_or(v, p, decode_link_at))?,
        callbacks: fields.map("callbacks", |v, p| ref_or(v, p, decode_callback_at))?,
        path_items: fields.map_with_key("pathItems", |name, v, p| {
            ref_or(v, p, |v, p| decode_path_item_at(v, p, name))
        })?,
        extensions: fields.extensions(),
    };
    debug!(
        schemas = components.schemas.len(),
        responses = components.responses.len(),
        parameters = components.parameters.len(),
        "decoded components"
    );
    Ok(components)
}

fn decode_security_scheme_at(value: &Value, path: &FieldPath) -> DecodeResult<SecurityScheme> {
    let fields = Fields::new(value, path, "a Security Scheme Object")?;
    let scheme_type = fields.required_str("type")?;
    let kind = match scheme_type.as_str() {
        "apiKey" => {
            let location_name = fields.required_str("in")?;
            let location = match ParameterLocation::parse(&location_name) {
                Some(loc @ (ParameterLocation::Query
                | ParameterLocation::Header
                | ParameterLocation::Cookie)) => loc,
                _ => {
                    return Err(fields.at("in").error(format!(
                        "one of query, header, cookie, found '{}'",
                        location_name
                    )))
                }
            };
            SecuritySchemeKind::ApiKey {
                name: fields.required_str("name")?,
                location,
            }
        }
        "http" => SecuritySchemeKind::Http {
            scheme: fields.required_str("scheme")?,
            bearer_format: fields.str("bearerFormat")?,
        },
        "oauth2" => {
            fields.required("flows", "an OAuth Flows Object")?;
            SecuritySchemeKind::OAuth2 {
                flows: fields.map("flows", decode_oauth_flow)?,
            }
        }
        "openIdConnect" => SecuritySchemeKind::OpenIdConnect {
            url: fields.required_str("openIdConnectUrl")?,
        },
        "mutualTLS" => SecuritySchemeKind::MutualTls,
        other => {
            return Err(fields.at("type").error(format!(
                "one of apiKey, http, oauth2, openIdConnect, mutualTLS, found '{}'",
                other
            )))
        }
    };
    Ok(SecurityScheme {
        kind,
        description: fields.str("description")?,
    })
}

fn decode_oauth_flow(value: &Value, path: &FieldPath) -> DecodeResult<OAuthFlow> {
    let fields = Fields::new(value, path, "an OAuth Flow Object")?;
    Ok(OAuthFlow {
        authorization_url: fields.str("authorizationUrl")?,
        token_url: fields.str("tokenUrl")?,
        refresh_url: fields.str("refreshUrl")?,
        scopes: fields.map("scopes", |v, p| {
            v.as_str()
                .map(str::to_string)
                .ok_or_else(|| p.error("a scope description"))
        })?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::schema::SchemaType;
    use serde_json::json;

    #[test]
    fn test_decode_components_sections() {
        let components = decode_components(&json!({
            "schemas": {
                "Pet": {"type": "object", "properties": {"id": {"type": "integer"}}},
                "Alias": {"$ref": "#/components/schemas/Pet"},
                "x-Legacy": {"type": "string"}
            },
            "responses": {"NotFound": {"description": "Missing"}},
            "parameters": {"Limit": {"name": "limit", "in": "query"}},
            "requestBodies": {"PetBody": {"content": {"application/json": {}}}},
            "headers": {"RateLimit": {"schema": {"type": "integer"}}},
            "pathItems": {"Shared": {"get": {"responses": {"200": {"description": "OK"}}}}},
            "x-owner": "team"
        }))
        .unwrap();

        let pet = components.schemas["Pet"].as_item().unwrap();
        assert_eq!(pet.schema_type, Some(SchemaType::Object));
        assert!(components.schemas["Alias"].is_reference());
        assert!(components.schemas.contains_key("x-Legacy"));
        assert_eq!(components.responses["NotFound"].as_item().unwrap().description, "Missing");
        assert_eq!(components.parameters["Limit"].as_item().unwrap().name, "limit");
        assert!(components.request_bodies.contains_key("PetBody"));
        assert!(components.headers.contains_key("RateLimit"));
        let shared = components.path_items["Shared"].as_item().unwrap();
        assert_eq!(shared.get.as_ref().unwrap().operation_id, "get_Shared");
        assert_eq!(components.extensions["x-owner"], json!("team"));
    }

    #[test]
    fn test_decode_security_schemes() {
        let components = decode_components(&json!({
            "securitySchemes": {
                "api_key": {"type": "apiKey", "name": "X-Key", "in": "header"},
                "bearer": {"type": "http", "scheme": "bearer", "bearerFormat": "JWT"},
                "oauth": {
                    "type": "oauth2",
                    "flows": {"clientCredentials": {"tokenUrl": "https://auth/token", "scopes": {"read": "Read"}}}
                },
                "mtls": {"type": "mutualTLS"}
            }
        }))
        .unwrap();
        let schemes = &components.security_schemes;
        assert_eq!(
            schemes["api_key"].as_item().unwrap().kind,
            SecuritySchemeKind::ApiKey {
                name: "X-Key".into(),
                location: ParameterLocation::Header
            }
        );
        match &schemes["oauth"].as_item().unwrap().kind {
            SecuritySchemeKind::OAuth2 { flows } => {
                assert_eq!(flows["clientCredentials"].scopes["read"], "Read");
            }
            other => panic!("unexpected scheme {:?}", other),
        }
        assert_eq!(schemes["mtls"].as_item().unwrap().kind, SecuritySchemeKind::MutualTls);
    }

    #[test]
    fn test_security_scheme_errors() {
        let err = decode_components(&json!({"securitySchemes": {"k": {"type": "basic"}}})).unwrap_err();
        assert_eq!(err.path, "securitySchemes.k.type");

        let err = decode_components(&json!({
            "securitySchemes": {"k": {"type": "apiKey", "name": "k", "in": "path"}}
        }))
        .unwrap_err();
        assert_eq!(err.path, "securitySchemes.k.in");
    }

    #[test]
    fn test_component_error_path() {
        let err = decode_components(&json!({"responses": {"Bad": {}}})).unwrap_err();
        assert_eq!(err.path, "responses.Bad.description");
    }
}
