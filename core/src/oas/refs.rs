#![deny(missing_docs)]

//! # References
//!
//! The `Reference | T` union that appears at every embedding point of the
//! graph, and helpers for reading `$ref` targets.
//!
//! These helpers never fetch anything: a target is either a local JSON
//! pointer into the current document (`#/components/...`) or it is external.

use percent_encoding::percent_decode_str;
use std::fmt;
use url::Url;

/// A slot that holds either a `$ref` or an inline object.
///
/// The tag is chosen once, at decode time, from the presence of the `$ref`
/// key. Consumers branch on it before touching inline-only fields.
#[derive(Debug, Clone, PartialEq)]
pub enum RefOr<T> {
    /// A pointer to a reusable component.
    Ref(Reference),
    /// An inline object.
    T(T),
}

impl<T> RefOr<T> {
    /// Returns the inline object, if this slot is not a reference.
    pub fn as_item(&self) -> Option<&T> {
        match self {
            RefOr::T(item) => Some(item),
            RefOr::Ref(_) => None,
        }
    }

    /// Returns the reference, if this slot is one.
    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            RefOr::Ref(reference) => Some(reference),
            RefOr::T(_) => None,
        }
    }

    /// True when the slot holds a `$ref`.
    pub fn is_reference(&self) -> bool {
        matches!(self, RefOr::Ref(_))
    }
}

impl<T> From<Reference> for RefOr<T> {
    fn from(reference: Reference) -> Self {
        RefOr::Ref(reference)
    }
}

/// A `$ref` with its optional overrides. Carries no behaviour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// The raw target, e.g. `#/components/schemas/Pet`.
    pub target: String,
    /// Summary override.
    pub summary: Option<String>,
    /// Description override.
    pub description: Option<String>,
}

impl Reference {
    /// Creates a reference without overrides.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            summary: None,
            description: None,
        }
    }

    /// The last segment of the target.
    /// e.g. `#/components/schemas/User` -> `User`
    pub fn name(&self) -> String {
        let last = self.target.rsplit('/').next().unwrap_or(&self.target);
        decode_pointer_segment(last)
    }

    /// Parses a local `#/components/{section}/{name}` target.
    ///
    /// Returns `None` for external targets, unknown sections and pointers
    /// that reach deeper than a component entry.
    pub fn component(&self) -> Option<(ComponentKind, String)> {
        let pointer = self.target.strip_prefix("#/")?;
        let segments: Vec<&str> = pointer.split('/').collect();
        if segments.len() != 3 || segments[0] != "components" {
            return None;
        }
        let kind = ComponentKind::from_section(segments[1])?;
        let name = decode_pointer_segment(segments[2]);
        if name.is_empty() {
            None
        } else {
            Some((kind, name))
        }
    }

    /// Classifies where the target lives.
    pub fn kind(&self) -> ReferenceKind {
        if self.target.starts_with('#') {
            ReferenceKind::Local
        } else if Url::parse(&self.target).is_ok() {
            ReferenceKind::Remote
        } else {
            ReferenceKind::Relative
        }
    }

    /// True when the target points into another document.
    pub fn is_external(&self) -> bool {
        self.kind() != ReferenceKind::Local
    }
}

/// Where a `$ref` target lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// A fragment-only pointer into the current document (`#/...`).
    Local,
    /// A relative document reference (`other.yaml#/...`).
    Relative,
    /// An absolute URI (`https://...`).
    Remote,
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.target)
    }
}

/// The sections of the Components Object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// `schemas`
    Schemas,
    /// `responses`
    Responses,
    /// `parameters`
    Parameters,
    /// `examples`
    Examples,
    /// `requestBodies`
    RequestBodies,
    /// `headers`
    Headers,
    /// `securitySchemes`
    SecuritySchemes,
    /// `links`
    Links,
    /// `callbacks`
    Callbacks,
    /// `pathItems`
    PathItems,
}

impl ComponentKind {
    /// Every section, in the order the Components Object lists them.
    pub const ALL: [ComponentKind; 10] = [
        ComponentKind::Schemas,
        ComponentKind::Responses,
        ComponentKind::Parameters,
        ComponentKind::Examples,
        ComponentKind::RequestBodies,
        ComponentKind::Headers,
        ComponentKind::SecuritySchemes,
        ComponentKind::Links,
        ComponentKind::Callbacks,
        ComponentKind::PathItems,
    ];

    /// The key used for this section in documents.
    pub fn section(self) -> &'static str {
        match self {
            ComponentKind::Schemas => "schemas",
            ComponentKind::Responses => "responses",
            ComponentKind::Parameters => "parameters",
            ComponentKind::Examples => "examples",
            ComponentKind::RequestBodies => "requestBodies",
            ComponentKind::Headers => "headers",
            ComponentKind::SecuritySchemes => "securitySchemes",
            ComponentKind::Links => "links",
            ComponentKind::Callbacks => "callbacks",
            ComponentKind::PathItems => "pathItems",
        }
    }

    /// Looks a section up by its document key.
    pub fn from_section(section: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.section() == section)
    }
}

/// Decodes a JSON Pointer segment (handles `~1`, `~0` and percent escapes).
pub(crate) fn decode_pointer_segment(segment: &str) -> String {
    let decoded = segment.replace("~1", "/").replace("~0", "~");
    percent_decode_str(&decoded)
        .decode_utf8_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_component_parsing() {
        let r = Reference::new("#/components/schemas/Pet");
        assert_eq!(r.component(), Some((ComponentKind::Schemas, "Pet".into())));
        assert_eq!(r.name(), "Pet");
        assert!(!r.is_external());
    }

    #[test]
    fn test_reference_component_wrong_section() {
        let r = Reference::new("#/components/widgets/Pet");
        assert!(r.component().is_none());
        let deep = Reference::new("#/components/schemas/Pet/properties/id");
        assert!(deep.component().is_none());
    }

    #[test]
    fn test_reference_external() {
        assert!(Reference::new("https://example.com/api.yaml#/components/schemas/Pet").is_external());
        assert!(Reference::new("other.yaml#/components/schemas/Pet").is_external());
        assert_eq!(Reference::new("other.yaml").kind(), ReferenceKind::Relative);
        assert_eq!(
            Reference::new("https://example.com/api.yaml").kind(),
            ReferenceKind::Remote
        );
        assert!(Reference::new("https://example.com/api.yaml#/components/schemas/Pet")
            .component()
            .is_none());
    }

    #[test]
    fn test_decode_pointer_segment_percent_encoding() {
        let encoded = "User%20Profile~1details";
        assert_eq!(decode_pointer_segment(encoded), "User Profile/details");
        let r = Reference::new("#/components/schemas/User%20Profile~1details");
        assert_eq!(r.name(), "User Profile/details");
    }

    #[test]
    fn test_ref_or_accessors() {
        let slot: RefOr<u8> = Reference::new("#/components/schemas/A").into();
        assert!(slot.is_reference());
        assert!(slot.as_item().is_none());
        let inline: RefOr<u8> = RefOr::T(7);
        assert_eq!(inline.as_item(), Some(&7));
        assert!(inline.as_reference().is_none());
    }
}
