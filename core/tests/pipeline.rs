use dymock_core::mock::is_placeholder;
use dymock_core::oas::decoder::{decode_header, decode_schema};
use dymock_core::oas::RefOr;
use dymock_core::{
    load_document, parse_document, AppError, DocumentFormat, RouteAdapter, Synthesizer,
    ValidationMode, Validator,
};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;

const STORE: &str = r#"
openapi: 3.0.3
info:
  title: Store
  version: 1.0.0
paths:
  /pets:
    get:
      responses:
        '200':
          description: OK
          content:
            application/json:
              schema:
                type: array
                items: {$ref: '#/components/schemas/Pet'}
    post:
      operationId: createPet
      requestBody:
        required: true
        content:
          application/json:
            schema: {$ref: '#/components/schemas/Pet'}
      responses:
        '200': {description: OK}
        '201':
          description: Created
          content:
            application/json:
              schema: {$ref: '#/components/schemas/Pet'}
  /pets/{petId}:
    delete:
      operationId: deletePet
      responses:
        '200': {description: Deleted}
components:
  schemas:
    Pet:
      type: object
      required: [id, name]
      properties:
        id: {type: integer, minimum: 1}
        name: {type: string, minLength: 2, maxLength: 12}
        status: {type: string, enum: [available, pending, sold]}
        tags:
          type: array
          items: {type: string}
        owner: {$ref: '#/components/schemas/Owner'}
    Owner:
      type: object
      required: [name]
      properties:
        name: {type: string}
    Node:
      type: object
      required: [value, next]
      properties:
        value: {type: integer}
        next: {$ref: '#/components/schemas/Node'}
"#;

fn pet_ref() -> RefOr<dymock_core::oas::Schema> {
    decode_schema(&json!({"$ref": "#/components/schemas/Pet"})).unwrap()
}

#[test]
fn test_synthesized_values_validate_strictly() {
    let doc = load_document(STORE, DocumentFormat::Yaml).unwrap();
    let synthesizer = Synthesizer::for_document(&doc);
    let validator = Validator::for_document(&doc).with_mode(ValidationMode::Strict);
    let pet = pet_ref();

    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let value = synthesizer.synthesize(&pet, &mut rng);
        assert!(
            validator.validate(&value, &pet).is_ok(),
            "seed {} produced {}",
            seed,
            value
        );
        let status = value.get("status").and_then(|s| s.as_str());
        if let Some(status) = status {
            assert!(["available", "pending", "sold"].contains(&status));
        }
    }
}

#[test]
fn test_same_seed_same_value() {
    let doc = load_document(STORE, DocumentFormat::Yaml).unwrap();
    let synthesizer = Synthesizer::for_document(&doc);
    let pet = pet_ref();

    let first = synthesizer.synthesize(&pet, &mut StdRng::seed_from_u64(42));
    let second = synthesizer.synthesize(&pet, &mut StdRng::seed_from_u64(42));
    assert_eq!(first, second);
}

#[test]
fn test_self_reference_becomes_placeholder() {
    let doc = load_document(STORE, DocumentFormat::Yaml).unwrap();
    let node = decode_schema(&json!({"$ref": "#/components/schemas/Node"})).unwrap();
    let value = Synthesizer::for_document(&doc).synthesize(&node, &mut StdRng::seed_from_u64(1));

    assert!(value["value"].is_i64());
    assert!(is_placeholder(&value["next"]));
    assert_eq!(value["next"]["$ref"], "Node");
    let strict = Validator::for_document(&doc).with_mode(ValidationMode::Strict);
    assert_eq!(strict.validate(&value, &node), Ok(()));
}

#[test]
fn test_validation_failures_carry_paths() {
    let doc = load_document(STORE, DocumentFormat::Yaml).unwrap();
    let validator = Validator::for_document(&doc);
    let pet = pet_ref();

    let err = validator
        .validate(&json!({"name": "Rex"}), &pet)
        .unwrap_err();
    assert_eq!(err.path, "$");
    assert_eq!(err.reason, "missing required property 'id'");

    let tagged = json!({"id": 1, "name": "Rex", "tags": ["a", 2]});
    assert!(validator.validate(&tagged, &pet).is_ok());
    let err = validator
        .with_mode(ValidationMode::Strict)
        .validate(&tagged, &pet)
        .unwrap_err();
    assert_eq!(err.path, "$.tags[1]");
    assert_eq!(err.reason, "expected string, found integer");
}

#[test]
fn test_strict_mode_checks_enum_membership() {
    let doc = load_document(STORE, DocumentFormat::Yaml).unwrap();
    let pet = pet_ref();
    let value = json!({"id": 3, "name": "Rex", "status": "lost"});

    assert!(Validator::for_document(&doc).validate(&value, &pet).is_ok());
    let err = Validator::for_document(&doc)
        .with_mode(ValidationMode::Strict)
        .validate(&value, &pet)
        .unwrap_err();
    assert_eq!(err.path, "$.status");
    assert_eq!(err.reason, "value is not one of the enumerated values");
}

#[test]
fn test_routes_pick_statuses_by_method() {
    let doc = load_document(STORE, DocumentFormat::Yaml).unwrap();
    let adapter = RouteAdapter::new(&doc);

    let list = adapter.endpoint("get__pets").unwrap();
    assert_eq!(list.status, 200);
    let create = adapter.endpoint("createPet").unwrap();
    assert_eq!(create.status, 201);
    let delete = adapter.endpoint("deletePet").unwrap();
    assert_eq!(delete.status, 200);
    assert_eq!(delete.path_params, vec!["petId".to_string()]);
}

#[test]
fn test_handle_validates_then_replies() {
    let doc = load_document(STORE, DocumentFormat::Yaml).unwrap();
    let adapter = RouteAdapter::new(&doc);
    let mut rng = StdRng::seed_from_u64(7);

    let reply = adapter
        .handle("createPet", Some(&json!({"id": 1, "name": "Rex"})), &mut rng)
        .unwrap();
    assert_eq!(reply.status, 201);
    assert!(reply.body.unwrap()["id"].as_i64().unwrap() >= 1);

    let err = adapter
        .handle("createPet", Some(&json!({"id": 1})), &mut rng)
        .unwrap_err();
    assert_eq!(err.to_string(), "request rejected: $: missing required property 'name'");
}

#[test]
fn test_decode_schema_keeps_references() {
    let node = decode_schema(&json!({"$ref": "#/components/schemas/Pet"})).unwrap();
    match node {
        RefOr::Ref(reference) => assert_eq!(reference.target, "#/components/schemas/Pet"),
        RefOr::T(schema) => panic!("expected a reference, got {:?}", schema),
    }
}

#[test]
fn test_schema_extensions_survive() {
    let node = decode_schema(&json!({"type": "string", "x-internal": true})).unwrap();
    let schema = node.as_item().unwrap();
    assert_eq!(schema.extensions.get("x-internal"), Some(&json!(true)));
}

#[test]
fn test_document_and_operation_extensions_survive() {
    let text = r#"{
        "openapi": "3.1.0",
        "x-owner": "platform",
        "info": {"title": "T", "version": "1"},
        "paths": {"/ping": {"get": {
            "x-rate-limit": {"per-minute": 30},
            "responses": {"200": {"description": "pong"}}
        }}}
    }"#;
    let doc = load_document(text, DocumentFormat::Json).unwrap();
    assert_eq!(doc.extensions.get("x-owner"), Some(&json!("platform")));
    let (_, _, operation) = doc.find_operation("get__ping").unwrap();
    assert_eq!(
        operation.extensions.get("x-rate-limit"),
        Some(&json!({"per-minute": 30}))
    );
}

#[test]
fn test_inline_schemas_without_components() {
    let list = decode_schema(&json!({"type": "array", "items": {"type": "string"}})).unwrap();
    let err = dymock_core::validate(&json!(["a", 2, "c"]), &list).unwrap_err();
    assert_eq!(err.path, "$[1]");

    let object = decode_schema(&json!({"type": "object", "required": ["name", "id"]})).unwrap();
    let err = dymock_core::validate(&json!({"name": "x"}), &object).unwrap_err();
    assert_eq!(err.reason, "missing required property 'id'");
}

#[test]
fn test_header_with_schema_and_content_fails() {
    let raw = json!({
        "schema": {"type": "string"},
        "content": {"text/plain": {"schema": {"type": "string"}}}
    });
    assert!(decode_header(&raw).is_err());
}

#[test]
fn test_document_without_paths_fails() {
    let err = load_document("openapi: 3.0.0\ninfo: {title: T, version: '1'}\n", DocumentFormat::Yaml)
        .unwrap_err();
    assert!(matches!(err, AppError::Structural(_)));
}

#[test]
fn test_parse_rejects_empty_text() {
    assert!(matches!(
        parse_document("", DocumentFormat::Json),
        Err(AppError::Load(_))
    ));
}
