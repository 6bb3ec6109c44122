use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of API surface member an [`Element`] describes.
///
/// Declaration order is the primary sort key of the report, so packages come
/// first, then types, then members.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ElementKind {
    Package,
    Class,
    Interface,
    Method,
    Field,
}

impl ElementKind {
    /// Returns `true` for methods and fields.
    pub fn is_member(self) -> bool {
        matches!(self, Self::Method | Self::Field)
    }

    /// Returns `true` for kinds that can enclose other elements.
    pub fn is_container(self) -> bool {
        !self.is_member()
    }

    /// Label used when reporting a change of [`Element::declared_type`].
    ///
    /// The meaning of the declared type depends on the kind: a return type
    /// for methods, a value type for fields, a parent type otherwise.
    pub fn declared_type_label(self) -> &'static str {
        match self {
            Self::Method => "Return type",
            Self::Field => "Type",
            Self::Package | Self::Class | Self::Interface => "Parent",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Package => "package",
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Method => "method",
            Self::Field => "field",
        };
        f.write_str(s)
    }
}

/// Obligation of a property as declared by the governing standard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Obligation {
    Mandatory,
    Optional,
    Conditional,
}

impl fmt::Display for Obligation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Mandatory => "mandatory",
            Self::Optional => "optional",
            Self::Conditional => "conditional",
        };
        f.write_str(s)
    }
}

/// Canonical name of an element, e.g. `org.example.metadata.Citation`.
///
/// Used as the container back-reference of members and as the key of the
/// [`HierarchyMap`](crate::HierarchyMap). It is a plain value, so two
/// snapshots agree on it without sharing any object.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Id of an element named `java_name` enclosed by `container`.
    pub fn child(container: Option<&ElementId>, java_name: &str) -> Self {
        match container {
            Some(parent) => Self(format!("{}.{}", parent.0, java_name)),
            None => Self(java_name.to_string()),
        }
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementId({})", self.0)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ElementId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Identity of an element across versions: `(kind, container, java_name)`.
///
/// Two elements from different snapshots describe the same API member iff
/// their identities are equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity {
    pub kind: ElementKind,
    pub container: Option<ElementId>,
    pub java_name: String,
}

/// One named unit of an API surface with its standard-derived metadata.
///
/// Equality (`==`) compares every field and is the "full equality" used to
/// prune unchanged elements. Use [`Element::identity`] to match elements
/// across versions.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Element {
    pub kind: ElementKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<ElementId>,
    pub java_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ogc_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obligation: Option<Obligation>,
    #[serde(default = "default_public")]
    pub is_public: bool,
    #[serde(default)]
    pub is_deprecated: bool,
}

fn default_public() -> bool {
    true
}

impl Element {
    /// A public, non-deprecated element without standard metadata.
    pub fn new(kind: ElementKind, container: Option<ElementId>, java_name: impl Into<String>) -> Self {
        Self {
            kind,
            container,
            java_name: java_name.into(),
            ogc_name: None,
            declared_type: None,
            obligation: None,
            is_public: true,
            is_deprecated: false,
        }
    }

    pub fn package(name: impl Into<String>) -> Self {
        Self::new(ElementKind::Package, None, name)
    }

    pub fn class(container: impl Into<ElementId>, name: impl Into<String>) -> Self {
        Self::new(ElementKind::Class, Some(container.into()), name)
    }

    pub fn interface(container: impl Into<ElementId>, name: impl Into<String>) -> Self {
        Self::new(ElementKind::Interface, Some(container.into()), name)
    }

    pub fn method(container: impl Into<ElementId>, name: impl Into<String>) -> Self {
        Self::new(ElementKind::Method, Some(container.into()), name)
    }

    pub fn field(container: impl Into<ElementId>, name: impl Into<String>) -> Self {
        Self::new(ElementKind::Field, Some(container.into()), name)
    }

    pub fn with_ogc_name(mut self, name: impl Into<String>) -> Self {
        self.ogc_name = Some(name.into());
        self
    }

    pub fn with_declared_type(mut self, ty: impl Into<String>) -> Self {
        self.declared_type = Some(ty.into());
        self
    }

    pub fn with_obligation(mut self, obligation: Obligation) -> Self {
        self.obligation = Some(obligation);
        self
    }

    pub fn with_public(mut self, is_public: bool) -> Self {
        self.is_public = is_public;
        self
    }

    pub fn with_deprecated(mut self, is_deprecated: bool) -> Self {
        self.is_deprecated = is_deprecated;
        self
    }

    /// The cross-version identity of this element.
    pub fn identity(&self) -> Identity {
        Identity {
            kind: self.kind,
            container: self.container.clone(),
            java_name: self.java_name.clone(),
        }
    }

    /// Returns `true` if `other` has the same identity as `self`.
    pub fn same_identity(&self, other: &Element) -> bool {
        self.kind == other.kind
            && self.container == other.container
            && self.java_name == other.java_name
    }

    /// Returns `true` if identity and every other field are equal.
    pub fn full_equals(&self, other: &Element) -> bool {
        self == other
    }

    /// Canonical name of this element, usable as a container reference.
    pub fn id(&self) -> ElementId {
        ElementId::child(self.container.as_ref(), &self.java_name)
    }

    /// Name shown to readers of a report.
    pub fn display_name(&self) -> &str {
        &self.java_name
    }

    /// Name of the enclosing element, empty for top-level elements.
    pub fn container_display_name(&self) -> &str {
        self.container.as_ref().map(ElementId::as_str).unwrap_or("")
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.id())
    }
}

/// Report order: kind, then container name, then Java name.
///
/// Elements with no container sort before any contained element of the same
/// kind. The remaining fields only break ties between elements that share an
/// identity, which never happens within one well-formed snapshot.
impl Ord for Element {
    fn cmp(&self, other: &Self) -> Ordering {
        self.kind
            .cmp(&other.kind)
            .then_with(|| self.container_display_name().cmp(other.container_display_name()))
            .then_with(|| self.java_name.cmp(&other.java_name))
            .then_with(|| self.container.is_some().cmp(&other.container.is_some()))
            .then_with(|| self.ogc_name.cmp(&other.ogc_name))
            .then_with(|| self.declared_type.cmp(&other.declared_type))
            .then_with(|| self.obligation.cmp(&other.obligation))
            .then_with(|| self.is_public.cmp(&other.is_public))
            .then_with(|| self.is_deprecated.cmp(&other.is_deprecated))
    }
}

impl PartialOrd for Element {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_kinds() {
        assert!(ElementKind::Method.is_member());
        assert!(ElementKind::Field.is_member());
        assert!(!ElementKind::Class.is_member());
        assert!(ElementKind::Interface.is_container());
        assert!(ElementKind::Package.is_container());
    }

    #[test]
    fn declared_type_labels() {
        assert_eq!(ElementKind::Method.declared_type_label(), "Return type");
        assert_eq!(ElementKind::Field.declared_type_label(), "Type");
        assert_eq!(ElementKind::Interface.declared_type_label(), "Parent");
    }

    #[test]
    fn id_joins_container_and_name() {
        let pkg = Element::package("org.example");
        assert_eq!(pkg.id().as_str(), "org.example");

        let ty = Element::interface("org.example", "Citation");
        assert_eq!(ty.id().as_str(), "org.example.Citation");

        let m = Element::method(ty.id(), "getTitle");
        assert_eq!(m.id().as_str(), "org.example.Citation.getTitle");
    }

    #[test]
    fn identity_ignores_metadata() {
        let a = Element::method("Foo", "getCode").with_ogc_name("code");
        let b = Element::method("Foo", "getCode").with_ogc_name("identifier");
        assert_eq!(a.identity(), b.identity());
        assert!(a.same_identity(&b));
        assert!(!a.full_equals(&b));
    }

    #[test]
    fn identity_includes_container() {
        let a = Element::method("Foo", "getCode");
        let b = Element::method("Bar", "getCode");
        assert_ne!(a.identity(), b.identity());
    }

    #[test]
    fn full_equals_compares_flags() {
        let a = Element::field("Foo", "flag");
        let b = a.clone().with_deprecated(true);
        assert!(a.full_equals(&a.clone()));
        assert!(!a.full_equals(&b));
    }

    #[test]
    fn ordering_is_kind_then_container_then_name() {
        let mut elements = vec![
            Element::method("b.Type", "alpha"),
            Element::field("a.Type", "zeta"),
            Element::method("a.Type", "beta"),
            Element::interface("a", "Type"),
            Element::package("a"),
        ];
        elements.sort();

        let names: Vec<String> = elements.iter().map(|e| e.id().to_string()).collect();
        assert_eq!(
            names,
            vec!["a", "a.Type", "a.Type.beta", "b.Type.alpha", "a.Type.zeta"]
        );
    }

    #[test]
    fn top_level_sorts_before_contained() {
        let top = Element::new(ElementKind::Class, None, "Foo");
        let nested = Element::class("", "Foo");
        assert_eq!(top.cmp(&nested), Ordering::Less);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn arb_element() -> impl Strategy<Value = Element> {
            (
                prop_oneof![Just(ElementKind::Class), Just(ElementKind::Method)],
                proptest::option::of(prop_oneof![Just("a"), Just("b"), Just("")]),
                "[xy]{1,2}",
                any::<bool>(),
            )
                .prop_map(|(kind, container, name, deprecated)| {
                    Element::new(kind, container.map(ElementId::from), name).with_deprecated(deprecated)
                })
        }

        proptest! {
            #[test]
            fn ordering_agrees_with_equality(a in arb_element(), b in arb_element()) {
                prop_assert_eq!(a.cmp(&b) == Ordering::Equal, a == b);
                prop_assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
            }
        }
    }

    #[test]
    fn serde_defaults() {
        let json = r#"{"kind":"METHOD","container":"org.example.Foo","java_name":"getName"}"#;
        let e: Element = serde_json::from_str(json).unwrap();
        assert_eq!(e, Element::method("org.example.Foo", "getName"));
        assert!(e.is_public);
        assert!(!e.is_deprecated);
    }

    #[test]
    fn serde_roundtrip_with_metadata() {
        let e = Element::method("Foo", "getCode")
            .with_ogc_name("code")
            .with_obligation(Obligation::Mandatory)
            .with_declared_type("String");
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains("\"MANDATORY\""));
        let back: Element = serde_json::from_str(&json).unwrap();
        assert_eq!(e, back);
    }
}
