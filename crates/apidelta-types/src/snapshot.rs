//! Snapshot: the complete element set collected for one library version.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::element::{Element, Identity};
use crate::error::ModelError;

/// Insertion-ordered set of [`Element`]s keyed by identity.
///
/// A snapshot never holds two elements with the same identity; construction
/// rejects duplicates instead of silently keeping one of them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Element>", into = "Vec<Element>")]
pub struct Snapshot {
    elements: IndexMap<Identity, Element>,
}

impl Snapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot, failing on the first duplicate identity.
    pub fn from_elements(elements: impl IntoIterator<Item = Element>) -> Result<Self, ModelError> {
        let mut snapshot = Self::new();
        for element in elements {
            snapshot.insert(element)?;
        }
        Ok(snapshot)
    }

    /// Parse a snapshot from a JSON array of elements.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        serde_json::from_str(json).map_err(|e| ModelError::Serialization(e.to_string()))
    }

    /// Append an element.
    pub fn insert(&mut self, element: Element) -> Result<(), ModelError> {
        let identity = element.identity();
        if self.elements.contains_key(&identity) {
            return Err(ModelError::DuplicateIdentity {
                kind: identity.kind,
                container: identity.container,
                java_name: identity.java_name,
            });
        }
        self.elements.insert(identity, element);
        Ok(())
    }

    /// The element with the given identity, if any.
    pub fn get(&self, identity: &Identity) -> Option<&Element> {
        self.elements.get(identity)
    }

    /// Returns `true` if an element fully equal to `element` is present.
    pub fn contains_exact(&self, element: &Element) -> bool {
        self.elements
            .get(&element.identity())
            .is_some_and(|e| e.full_equals(element))
    }

    /// Elements in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl TryFrom<Vec<Element>> for Snapshot {
    type Error = ModelError;

    fn try_from(elements: Vec<Element>) -> Result<Self, Self::Error> {
        Self::from_elements(elements)
    }
}

impl From<Snapshot> for Vec<Element> {
    fn from(snapshot: Snapshot) -> Self {
        snapshot.elements.into_values().collect()
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a Element;
    type IntoIter = indexmap::map::Values<'a, Identity, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementKind, Obligation};

    #[test]
    fn preserves_insertion_order() {
        let snapshot = Snapshot::from_elements([
            Element::method("Foo", "zeta"),
            Element::method("Foo", "alpha"),
            Element::interface("pkg", "Foo"),
        ])
        .unwrap();

        let names: Vec<&str> = snapshot.iter().map(|e| e.java_name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "Foo"]);
    }

    #[test]
    fn rejects_duplicate_identity() {
        let err = Snapshot::from_elements([
            Element::method("Foo", "getCode").with_ogc_name("code"),
            Element::method("Foo", "getCode").with_ogc_name("identifier"),
        ])
        .unwrap_err();

        assert_eq!(
            err,
            ModelError::DuplicateIdentity {
                kind: ElementKind::Method,
                container: Some("Foo".into()),
                java_name: "getCode".into(),
            }
        );
    }

    #[test]
    fn same_name_different_kind_is_not_duplicate() {
        let snapshot = Snapshot::from_elements([
            Element::method("Foo", "code"),
            Element::field("Foo", "code"),
        ])
        .unwrap();
        assert_eq!(snapshot.len(), 2);
    }

    #[test]
    fn contains_exact_requires_full_equality() {
        let snapshot = Snapshot::from_elements([Element::method("Foo", "getCode")
            .with_ogc_name("code")
            .with_obligation(Obligation::Mandatory)])
        .unwrap();

        let same = Element::method("Foo", "getCode")
            .with_ogc_name("code")
            .with_obligation(Obligation::Mandatory);
        let renamed = same.clone().with_ogc_name("identifier");

        assert!(snapshot.contains_exact(&same));
        assert!(!snapshot.contains_exact(&renamed));
        assert!(snapshot.get(&renamed.identity()).is_some());
    }

    #[test]
    fn json_array_roundtrip() {
        let json = r#"[
            {"kind":"INTERFACE","container":"org.example","java_name":"Citation"},
            {"kind":"METHOD","container":"org.example.Citation","java_name":"getTitle",
             "ogc_name":"title","obligation":"MANDATORY"}
        ]"#;
        let snapshot = Snapshot::from_json(json).unwrap();
        assert_eq!(snapshot.len(), 2);

        let out = serde_json::to_string(&snapshot).unwrap();
        let back = Snapshot::from_json(&out).unwrap();
        assert_eq!(snapshot, back);
    }

    #[test]
    fn json_with_duplicates_is_rejected() {
        let json = r#"[
            {"kind":"FIELD","container":"Foo","java_name":"flag"},
            {"kind":"FIELD","container":"Foo","java_name":"flag","is_deprecated":true}
        ]"#;
        let err = Snapshot::from_json(json).unwrap_err();
        assert!(matches!(err, ModelError::Serialization(msg) if msg.contains("duplicate")));
    }
}
