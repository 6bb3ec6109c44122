//! Per-element change records and their textual rendering.

use std::fmt;

use apidelta_types::{Element, ElementKind, Obligation};
use serde::{Deserialize, Serialize};

/// Separator placed between the segments of a rendered change record.
pub const SEGMENT_SEPARATOR: &str = "; ";

/// Old and new value of one aspect that differs between versions.
///
/// Either side may be absent: `old: None` means the aspect was introduced,
/// `new: None` means it was dropped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange<T> {
    pub old: Option<T>,
    pub new: Option<T>,
}

impl<T: Clone + PartialEq> FieldChange<T> {
    /// `Some` only when `old` and `new` differ.
    pub fn between(old: &Option<T>, new: &Option<T>) -> Option<Self> {
        (old != new).then(|| Self {
            old: old.clone(),
            new: new.clone(),
        })
    }

    /// Returns `true` if the aspect had a value and no longer has one.
    pub fn is_dropped(&self) -> bool {
        self.old.is_some() && self.new.is_none()
    }
}

/// Whether an element was added, removed, or modified.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeStatus {
    Added,
    Removed,
    Changed,
}

impl ChangeStatus {
    /// Classify a reported element by its record. An absent record means
    /// the element is new.
    pub fn of(record: Option<&ChangeRecord>) -> Self {
        match record {
            None => Self::Added,
            Some(r) if r.is_removed => Self::Removed,
            Some(_) => Self::Changed,
        }
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Changed => "changed",
        };
        f.write_str(s)
    }
}

/// How one element differs between the old and new snapshot.
///
/// A removed record carries no other information. Otherwise each aspect is
/// populated independently and only when it differs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_removed: bool,
    /// Change of the standard-derived identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<FieldChange<String>>,
    /// Change of the declared type, return type or parent type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared_type: Option<FieldChange<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obligation: Option<FieldChange<Obligation>>,
    /// New visibility, set only when it flipped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    /// New deprecation state, set only when it flipped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_deprecated: Option<bool>,
    /// Sibling that took over the identifier this element lost.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uml_moved_to: Option<String>,
}

impl ChangeRecord {
    /// Record for an element that exists only in the old snapshot.
    pub fn removed() -> Self {
        Self {
            is_removed: true,
            ..Self::default()
        }
    }

    /// Compare two versions of the same element field by field.
    pub fn compare(old: &Element, new: &Element) -> Self {
        debug_assert!(old.same_identity(new), "comparing unrelated elements");
        Self {
            is_removed: false,
            name: FieldChange::between(&old.ogc_name, &new.ogc_name),
            declared_type: FieldChange::between(&old.declared_type, &new.declared_type),
            obligation: FieldChange::between(&old.obligation, &new.obligation),
            is_public: (old.is_public != new.is_public).then_some(new.is_public),
            is_deprecated: (old.is_deprecated != new.is_deprecated).then_some(new.is_deprecated),
            uml_moved_to: None,
        }
    }

    /// Returns `true` if nothing is recorded.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Returns `true` if the element lost both its identifier and its
    /// obligation, regardless of what else changed.
    pub fn is_uml_removed(&self) -> bool {
        matches!(&self.name, Some(c) if c.is_dropped())
            && matches!(&self.obligation, Some(c) if c.is_dropped())
    }

    /// Identifier and obligation this element had before losing them.
    pub fn lost_uml_pair(&self) -> Option<(&str, Obligation)> {
        if !self.is_uml_removed() {
            return None;
        }
        let name = self.name.as_ref()?.old.as_deref()?;
        let obligation = self.obligation.as_ref()?.old?;
        Some((name, obligation))
    }

    /// Point this record at the sibling that now carries its identifier.
    ///
    /// Only the first call has an effect; returns whether it did.
    pub fn mark_if_uml_moved_to(&mut self, target: impl Into<String>) -> bool {
        if self.uml_moved_to.is_some() {
            return false;
        }
        self.uml_moved_to = Some(target.into());
        true
    }

    /// Human-readable summary for an element of the given kind.
    ///
    /// Segments appear in a fixed order: deprecation, identifier (or its
    /// relocation), obligation, declared type, visibility.
    pub fn describe(&self, kind: ElementKind) -> String {
        if self.is_removed {
            return "Removed".to_string();
        }

        let mut segments = Vec::new();
        match self.is_deprecated {
            Some(true) => segments.push("Deprecated".to_string()),
            Some(false) => segments.push("No longer deprecated".to_string()),
            None => {}
        }
        if let Some(target) = &self.uml_moved_to {
            segments.push(format!("Identifier moved to {target}"));
        } else if let Some(change) = &self.name {
            segments.push(describe_field("Identifier", change));
        }
        if let Some(change) = &self.obligation {
            segments.push(describe_field("Obligation", change));
        }
        if let Some(change) = &self.declared_type {
            segments.push(describe_field(kind.declared_type_label(), change));
        }
        match self.is_public {
            Some(true) => segments.push("Now public".to_string()),
            Some(false) => segments.push("No longer public".to_string()),
            None => {}
        }
        segments.join(SEGMENT_SEPARATOR)
    }
}

fn describe_field<T: fmt::Display>(label: &str, change: &FieldChange<T>) -> String {
    match (&change.old, &change.new) {
        (Some(old), Some(new)) => format!("{label} changed from {old} to {new}"),
        (None, Some(new)) => format!("{label} added: {new}"),
        (Some(old), None) => format!("{label} removed: {old}"),
        (None, None) => format!("{label} changed"),
    }
}
