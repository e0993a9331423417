#![deny(missing_docs)]

//! # Component Resolver
//!
//! Looks up local `#/components/<section>/<name>` references in a decoded
//! Components table.
//!
//! - Chains of references (`Alias -> Pet`) are followed to the first inline
//!   entry.
//! - A chain that revisits an entry is reported as a cycle instead of looping.
//! - External targets are never fetched; they are reported as unresolved.

use crate::oas::models::{Components, Header, OpenApiDocument, Parameter, RequestBody, Response};
use crate::oas::refs::{ComponentKind, RefOr, Reference};
use crate::oas::schema::Schema;
use derive_more::Display;
use indexmap::IndexMap;
use tracing::debug;

/// Why a reference could not be followed.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ResolveError {
    /// The resolver was built without a Components table.
    #[display("no components to resolve '{_0}' against")]
    NoComponents(String),
    /// The target lives in another document.
    #[display("external reference '{_0}' is not fetched")]
    External(String),
    /// The target is local but not a `#/components/<section>/<name>` entry.
    #[display("'{_0}' does not point at a component entry")]
    NotAComponent(String),
    /// The target names a different section than the slot expects.
    #[display("'{target}' is not in components.{expected}")]
    WrongKind {
        /// Raw target.
        target: String,
        /// Section the slot expects.
        expected: &'static str,
    },
    /// No entry with that name.
    #[display("'{_0}' is not defined")]
    Missing(String),
    /// The chain of references loops back on itself.
    #[display("reference cycle through '{_0}'")]
    Cycle(String),
}

impl std::error::Error for ResolveError {}

/// An inline component reached by following a reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<'a, T> {
    /// Name of the entry that held the inline object (the end of the chain).
    pub name: &'a str,
    /// The inline object.
    pub item: &'a T,
}

/// Borrowing view over a document's Components table.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentResolver<'a> {
    components: Option<&'a Components>,
}

impl<'a> ComponentResolver<'a> {
    /// Resolves against `components`.
    pub fn new(components: &'a Components) -> Self {
        Self {
            components: Some(components),
        }
    }

    /// Resolves against the document's components, if it declares any.
    pub fn for_document(document: &'a OpenApiDocument) -> Self {
        Self {
            components: document.components.as_ref(),
        }
    }

    /// A resolver that fails every lookup.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when a Components table is attached.
    pub fn has_components(&self) -> bool {
        self.components.is_some()
    }

    /// Follows a schema reference to its inline definition.
    pub fn schema(&self, reference: &Reference) -> Result<Resolved<'a, Schema>, ResolveError> {
        self.follow(reference, ComponentKind::Schemas, |c| &c.schemas)
    }

    /// Follows a response reference.
    pub fn response(&self, reference: &Reference) -> Result<Resolved<'a, Response>, ResolveError> {
        self.follow(reference, ComponentKind::Responses, |c| &c.responses)
    }

    /// Follows a request body reference.
    pub fn request_body(
        &self,
        reference: &Reference,
    ) -> Result<Resolved<'a, RequestBody>, ResolveError> {
        self.follow(reference, ComponentKind::RequestBodies, |c| &c.request_bodies)
    }

    /// Follows a parameter reference.
    pub fn parameter(&self, reference: &Reference) -> Result<Resolved<'a, Parameter>, ResolveError> {
        self.follow(reference, ComponentKind::Parameters, |c| &c.parameters)
    }

    /// Follows a header reference.
    pub fn header(&self, reference: &Reference) -> Result<Resolved<'a, Header>, ResolveError> {
        self.follow(reference, ComponentKind::Headers, |c| &c.headers)
    }

    /// Returns the inline response in `slot`, following it if it is a reference.
    pub fn response_of<'b>(&self, slot: &'b RefOr<Response>) -> Result<&'b Response, ResolveError>
    where
        'a: 'b,
    {
        match slot {
            RefOr::T(response) => Ok(response),
            RefOr::Ref(reference) => self.response(reference).map(|r| r.item),
        }
    }

    /// Returns the inline request body in `slot`, following it if it is a reference.
    pub fn request_body_of<'b>(
        &self,
        slot: &'b RefOr<RequestBody>,
    ) -> Result<&'b RequestBody, ResolveError>
    where
        'a: 'b,
    {
        match slot {
            RefOr::T(body) => Ok(body),
            RefOr::Ref(reference) => self.request_body(reference).map(|r| r.item),
        }
    }

    fn follow<T>(
        &self,
        reference: &Reference,
        kind: ComponentKind,
        section: impl Fn(&'a Components) -> &'a IndexMap<String, RefOr<T>>,
    ) -> Result<Resolved<'a, T>, ResolveError> {
        let result = self.walk(reference, kind, section);
        if let Err(err) = &result {
            debug!(target_ref = %reference.target, reason = %err, "reference left unresolved");
        }
        result
    }

    fn walk<T>(
        &self,
        reference: &Reference,
        kind: ComponentKind,
        section: impl Fn(&'a Components) -> &'a IndexMap<String, RefOr<T>>,
    ) -> Result<Resolved<'a, T>, ResolveError> {
        let components = self
            .components
            .ok_or_else(|| ResolveError::NoComponents(reference.target.clone()))?;
        let entries = section(components);

        let mut visited: Vec<String> = Vec::new();
        let mut current = reference;
        loop {
            if current.is_external() {
                return Err(ResolveError::External(current.target.clone()));
            }
            let (found, name) = current
                .component()
                .ok_or_else(|| ResolveError::NotAComponent(current.target.clone()))?;
            if found != kind {
                return Err(ResolveError::WrongKind {
                    target: current.target.clone(),
                    expected: kind.section(),
                });
            }
            if visited.contains(&name) {
                return Err(ResolveError::Cycle(current.target.clone()));
            }

            let (key, entry) = entries
                .get_key_value(&name)
                .ok_or_else(|| ResolveError::Missing(current.target.clone()))?;
            match entry {
                RefOr::T(item) => return Ok(Resolved { name: key, item }),
                RefOr::Ref(next) => {
                    visited.push(name);
                    current = next;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::decoder::decode_components;
    use crate::oas::schema::SchemaType;
    use serde_json::json;

    fn components() -> Components {
        decode_components(&json!({
            "schemas": {
                "Pet": {"type": "object", "required": ["id"]},
                "Alias": {"$ref": "#/components/schemas/Pet"},
                "AliasOfAlias": {"$ref": "#/components/schemas/Alias"},
                "LoopA": {"$ref": "#/components/schemas/LoopB"},
                "LoopB": {"$ref": "#/components/schemas/LoopA"},
                "Dangling": {"$ref": "#/components/schemas/Nope"}
            },
            "responses": {
                "NotFound": {"description": "Missing"},
                "Gone": {"$ref": "#/components/responses/NotFound"}
            },
            "requestBodies": {"PetBody": {"required": true, "content": {}}}
        }))
        .unwrap()
    }

    #[test]
    fn test_resolve_schema_direct_and_chained() {
        let components = components();
        let resolver = ComponentResolver::new(&components);

        let direct = resolver.schema(&Reference::new("#/components/schemas/Pet")).unwrap();
        assert_eq!(direct.name, "Pet");
        assert_eq!(direct.item.schema_type, Some(SchemaType::Object));

        let chained = resolver
            .schema(&Reference::new("#/components/schemas/AliasOfAlias"))
            .unwrap();
        assert_eq!(chained.name, "Pet");
    }

    #[test]
    fn test_resolve_reports_cycles() {
        let components = components();
        let resolver = ComponentResolver::new(&components);
        let err = resolver
            .schema(&Reference::new("#/components/schemas/LoopA"))
            .unwrap_err();
        assert!(matches!(err, ResolveError::Cycle(_)));
    }

    #[test]
    fn test_resolve_failures() {
        let components = components();
        let resolver = ComponentResolver::new(&components);

        assert_eq!(
            resolver.schema(&Reference::new("#/components/schemas/Dangling")),
            Err(ResolveError::Missing("#/components/schemas/Nope".into()))
        );
        assert!(matches!(
            resolver.schema(&Reference::new("pets.yaml#/Pet")),
            Err(ResolveError::External(_))
        ));
        assert!(matches!(
            resolver.schema(&Reference::new("#/definitions/Pet")),
            Err(ResolveError::NotAComponent(_))
        ));
        assert!(matches!(
            resolver.schema(&Reference::new("#/components/responses/NotFound")),
            Err(ResolveError::WrongKind { expected: "schemas", .. })
        ));
        assert!(matches!(
            ComponentResolver::empty().schema(&Reference::new("#/components/schemas/Pet")),
            Err(ResolveError::NoComponents(_))
        ));
    }

    #[test]
    fn test_resolve_slots() {
        let components = components();
        let resolver = ComponentResolver::new(&components);

        let slot = RefOr::Ref(Reference::new("#/components/responses/Gone"));
        assert_eq!(resolver.response_of(&slot).unwrap().description, "Missing");

        let inline = RefOr::T(Response {
            description: "Inline".into(),
            ..Response::default()
        });
        assert_eq!(resolver.response_of(&inline).unwrap().description, "Inline");

        let body = RefOr::Ref(Reference::new("#/components/requestBodies/PetBody"));
        assert!(resolver.request_body_of(&body).unwrap().required);
    }
}
