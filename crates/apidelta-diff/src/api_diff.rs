//! API-level diff: reconcile two snapshots into an ordered list of changes.
//!
//! The reconciliation runs as a fixed pipeline. Every stage builds a fresh
//! collection from the previous one instead of editing it in place:
//!
//! 1. drop elements that are fully equal in both snapshots;
//! 2. pair the remaining new elements with same-identity old elements and
//!    compute their [`ChangeRecord`]s (unpaired new elements are additions);
//! 3. discard old members that only moved within the new type hierarchy;
//! 4. drop members of containers that were added or removed as a whole;
//! 5. mark the remaining old elements as removed;
//! 6. detect identifiers that moved to a sibling member;
//! 7. merge and sort.

use std::collections::{HashMap, HashSet};

use apidelta_types::{Element, ElementId, HierarchyMap, Identity, Snapshot};
use serde::Serialize;
use tracing::{debug, trace};

use crate::change_record::{ChangeRecord, ChangeStatus};
use crate::config::DiffConfig;
use crate::error::{DiffError, DiffResult};

/// One reported element and its change. `None` means the element was added.
pub type DiffEntry = (Element, Option<ChangeRecord>);

/// The result of comparing two API snapshots.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApiDiff {
    /// Reported elements in report order.
    pub entries: Vec<DiffEntry>,
}

impl ApiDiff {
    /// Create an empty diff.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if there are no changes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of reported elements.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Consume the diff, yielding the ordered entries.
    pub fn into_entries(self) -> Vec<DiffEntry> {
        self.entries
    }

    /// Status of every entry, in order.
    pub fn statuses(&self) -> impl Iterator<Item = ChangeStatus> + '_ {
        self.entries.iter().map(|(_, record)| ChangeStatus::of(record.as_ref()))
    }

    /// Number of added elements.
    pub fn additions(&self) -> usize {
        self.count(ChangeStatus::Added)
    }

    /// Number of removed elements.
    pub fn removals(&self) -> usize {
        self.count(ChangeStatus::Removed)
    }

    /// Number of modified elements.
    pub fn modifications(&self) -> usize {
        self.count(ChangeStatus::Changed)
    }

    fn count(&self, status: ChangeStatus) -> usize {
        self.statuses().filter(|s| *s == status).count()
    }

    /// The entry for the element with the given identity, if reported.
    pub fn find(&self, identity: &Identity) -> Option<&DiffEntry> {
        self.entries
            .iter()
            .find(|(element, _)| element.identity() == *identity)
    }

    /// Serialize the entries as a JSON array for an external renderer.
    ///
    /// Each item carries the element, its status, the raw record and the
    /// rendered description.
    pub fn to_json(&self) -> DiffResult<String> {
        let view: Vec<EntryView<'_>> = self
            .entries
            .iter()
            .map(|(element, record)| EntryView {
                element,
                status: ChangeStatus::of(record.as_ref()),
                change: record.as_ref(),
                description: record.as_ref().map(|r| r.describe(element.kind)),
            })
            .collect();
        serde_json::to_string_pretty(&view).map_err(|e| DiffError::Serialization(e.to_string()))
    }
}

#[derive(Serialize)]
struct EntryView<'a> {
    element: &'a Element,
    status: ChangeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    change: Option<&'a ChangeRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

/// Compare two snapshots with the default configuration.
pub fn diff(old: &Snapshot, new: &Snapshot, hierarchy: &HierarchyMap) -> ApiDiff {
    diff_with_config(old, new, hierarchy, &DiffConfig::default())
}

/// Validate `hierarchy` against the new snapshot, then diff.
///
/// Use this when the inputs come from an untrusted extractor; [`diff`]
/// assumes they are well formed.
pub fn diff_checked(
    old: &Snapshot,
    new: &Snapshot,
    hierarchy: &HierarchyMap,
    config: &DiffConfig,
) -> DiffResult<ApiDiff> {
    hierarchy.validate(new)?;
    Ok(diff_with_config(old, new, hierarchy, config))
}

/// Compare two snapshots.
///
/// This is a pure function of its inputs: running it twice on the same
/// arguments yields identical entries in identical order.
pub fn diff_with_config(
    old: &Snapshot,
    new: &Snapshot,
    hierarchy: &HierarchyMap,
    config: &DiffConfig,
) -> ApiDiff {
    // Unchanged elements never reach the report.
    let old_retained: Vec<&Element> = old.iter().filter(|e| !new.contains_exact(e)).collect();
    let new_retained: Vec<&Element> = new.iter().filter(|e| !old.contains_exact(e)).collect();
    debug!(
        retained_old = old_retained.len(),
        retained_new = new_retained.len(),
        "eliminated unchanged elements"
    );

    let (reported, paired) = compute_changes(&old_retained, &new_retained, config);

    let leftover: Vec<&Element> = old_retained
        .iter()
        .copied()
        .filter(|e| !paired.contains(&e.identity()))
        .collect();
    let removed = drop_reparented(leftover, &new_retained, hierarchy);

    let reported = cascade_reported(reported);
    let removed = cascade_removed(removed);

    let mut reported: Vec<DiffEntry> = reported
        .into_iter()
        .map(|(element, record)| (element.clone(), record))
        .collect();
    let removed: Vec<DiffEntry> = removed
        .into_iter()
        .map(|element| (element.clone(), Some(ChangeRecord::removed())))
        .collect();
    debug!(removed = removed.len(), "marked removed elements");

    detect_identifier_moves(&mut reported, new);

    let mut entries = reported;
    entries.extend(removed);
    entries.sort_by(|(a, _), (b, _)| a.cmp(b));

    ApiDiff { entries }
}

/// Pair each retained new element with its old counterpart.
///
/// Returns the reported new elements and the identities that found a
/// counterpart.
fn compute_changes<'a>(
    old_retained: &[&'a Element],
    new_retained: &[&'a Element],
    config: &DiffConfig,
) -> (Vec<(&'a Element, Option<ChangeRecord>)>, HashSet<Identity>) {
    let old_by_identity: HashMap<Identity, &Element> =
        old_retained.iter().map(|e| (e.identity(), *e)).collect();

    let mut reported = Vec::with_capacity(new_retained.len());
    let mut paired = HashSet::new();
    let mut suppressed = 0usize;

    for &element in new_retained {
        let identity = element.identity();
        match old_by_identity.get(&identity) {
            Some(previous) => {
                let record = ChangeRecord::compare(previous, element);
                debug_assert!(!record.is_empty(), "unequal elements produced an empty record");
                paired.insert(identity);
                reported.push((element, Some(record)));
            }
            None if config.suppress_deprecated_additions && element.is_deprecated => {
                trace!(element = %element, "skipping addition that is already deprecated");
                suppressed += 1;
            }
            None => reported.push((element, None)),
        }
    }

    debug!(
        changed = paired.len(),
        added = reported.len() - paired.len(),
        suppressed,
        "computed per-element changes"
    );
    (reported, paired)
}

/// Remove old members whose name reappears on a related type.
///
/// A member counts as moved, not removed, when some retained new member of
/// the same name lives in a type that is the old container, an ancestor of
/// it, or a descendant of it in the new hierarchy.
fn drop_reparented<'a>(
    leftover: Vec<&'a Element>,
    new_retained: &[&Element],
    hierarchy: &HierarchyMap,
) -> Vec<&'a Element> {
    let before = leftover.len();
    let removed: Vec<&Element> = leftover
        .into_iter()
        .filter(|old| !is_reparented(old, new_retained, hierarchy))
        .collect();
    debug!(reparented = before - removed.len(), "resolved reparented members");
    removed
}

fn is_reparented(old: &Element, new_retained: &[&Element], hierarchy: &HierarchyMap) -> bool {
    if !old.kind.is_member() {
        return false;
    }
    let Some(old_container) = old.container.as_ref() else {
        return false;
    };

    let target = new_retained
        .iter()
        .filter(|e| e.kind.is_member() && e.java_name == old.java_name)
        .filter_map(|e| e.container.as_ref())
        .find(|new_container| {
            hierarchy.is_ancestor_or_self(new_container, old_container)
                || hierarchy.is_ancestor_or_self(old_container, new_container)
        });

    if let Some(new_container) = target {
        trace!(member = %old, to = %new_container, "member moved within hierarchy");
        true
    } else {
        false
    }
}

/// Drop members of containers that are themselves reported as added.
///
/// Changed containers keep their members listed.
fn cascade_reported(
    reported: Vec<(&Element, Option<ChangeRecord>)>,
) -> Vec<(&Element, Option<ChangeRecord>)> {
    let added: HashSet<ElementId> = reported
        .iter()
        .filter(|(e, record)| record.is_none() && e.kind.is_container())
        .map(|(e, _)| e.id())
        .collect();

    let before = reported.len();
    let kept: Vec<_> = reported
        .into_iter()
        .filter(|(e, _)| !is_enclosed_by(e, &added))
        .collect();
    debug!(cascaded = before - kept.len(), "dropped members of added containers");
    kept
}

/// Drop members of containers that are themselves removed.
fn cascade_removed(removed: Vec<&Element>) -> Vec<&Element> {
    let containers: HashSet<ElementId> = removed
        .iter()
        .filter(|e| e.kind.is_container())
        .map(|e| e.id())
        .collect();

    let before = removed.len();
    let kept: Vec<&Element> = removed
        .into_iter()
        .filter(|e| !is_enclosed_by(e, &containers))
        .collect();
    debug!(cascaded = before - kept.len(), "dropped members of removed containers");
    kept
}

fn is_enclosed_by(element: &Element, containers: &HashSet<ElementId>) -> bool {
    element
        .container
        .as_ref()
        .is_some_and(|c| containers.contains(c))
}

/// Point records that lost their identifier at the sibling that gained it.
///
/// A move is recorded only when exactly one sibling member of the new
/// snapshot now carries the lost `(identifier, obligation)` pair.
fn detect_identifier_moves(reported: &mut [DiffEntry], new: &Snapshot) {
    let mut relocated = 0usize;

    for (element, record) in reported.iter_mut() {
        let element = &*element;
        let Some(record) = record.as_mut() else {
            continue;
        };
        let Some((name, obligation)) = record.lost_uml_pair() else {
            continue;
        };

        let mut candidates = new.iter().filter(|sibling| {
            sibling.kind.is_member()
                && sibling.container == element.container
                && !sibling.same_identity(element)
                && sibling.ogc_name.as_deref() == Some(name)
                && sibling.obligation == Some(obligation)
        });

        let target = match (candidates.next(), candidates.next()) {
            (Some(only), None) => only.display_name().to_string(),
            _ => continue,
        };

        trace!(element = %element, to = %target, "identifier moved to sibling");
        if record.mark_if_uml_moved_to(target) {
            relocated += 1;
        }
    }

    debug!(relocated, "detected identifier relocations");
}
