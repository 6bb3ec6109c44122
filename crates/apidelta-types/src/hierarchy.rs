//! Type hierarchy of the new snapshot: canonical type name to direct parent.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::element::ElementId;
use crate::error::ModelError;
use crate::snapshot::Snapshot;

/// Mapping from a type's canonical name to its direct parent's canonical name.
///
/// Only the new snapshot's ancestry is recorded. Walks over the map are
/// bounded by its size, so a cyclic or dangling entry cannot hang a caller.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HierarchyMap {
    parents: BTreeMap<ElementId, ElementId>,
}

impl HierarchyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `parent` as the direct parent of `child`, replacing any
    /// previous entry.
    pub fn insert(&mut self, child: impl Into<ElementId>, parent: impl Into<ElementId>) {
        self.parents.insert(child.into(), parent.into());
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, child: impl Into<ElementId>, parent: impl Into<ElementId>) -> Self {
        self.insert(child, parent);
        self
    }

    pub fn parent_of(&self, child: &ElementId) -> Option<&ElementId> {
        self.parents.get(child)
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Walk upward from `start`, yielding `start` itself and then each parent.
    ///
    /// Stops at the first type with no recorded parent, or after
    /// `len() + 1` names, whichever comes first.
    pub fn walk_up<'a>(&'a self, start: &'a ElementId) -> impl Iterator<Item = &'a ElementId> + 'a {
        std::iter::successors(Some(start), move |current| self.parents.get(*current))
            .take(self.parents.len() + 1)
    }

    /// Returns `true` if `ancestor` is `descendant` or is reachable from it
    /// by following parent links.
    pub fn is_ancestor_or_self(&self, descendant: &ElementId, ancestor: &ElementId) -> bool {
        self.walk_up(descendant).any(|name| name == ancestor)
    }

    /// Check that every entry names a container element of `snapshot`.
    ///
    /// Extractors call this before handing the map to the differ, which
    /// assumes well-formed input.
    pub fn validate(&self, snapshot: &Snapshot) -> Result<(), ModelError> {
        let known: HashSet<ElementId> = snapshot
            .iter()
            .filter(|e| e.kind.is_container())
            .map(|e| e.id())
            .collect();

        for (child, parent) in &self.parents {
            for name in [child, parent] {
                if !known.contains(name) {
                    return Err(ModelError::UnknownType {
                        child: child.clone(),
                        parent: parent.clone(),
                        missing: name.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl<C, P> FromIterator<(C, P)> for HierarchyMap
where
    C: Into<ElementId>,
    P: Into<ElementId>,
{
    fn from_iter<I: IntoIterator<Item = (C, P)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (child, parent) in iter {
            map.insert(child, parent);
        }
        map
    }
}
