//! Element model for apidelta.
//!
//! This crate provides the value types that describe one version of a
//! library's public surface. Extractors produce them; the diff engine in
//! `apidelta-diff` consumes them.
//!
//! # Key Types
//!
//! - [`Element`] -- One package, type, method or field with its standard metadata
//! - [`Identity`] -- `(kind, container, java_name)` key matching elements across versions
//! - [`ElementId`] -- Canonical name used as container reference and hierarchy key
//! - [`Snapshot`] -- Insertion-ordered, duplicate-free element set for one version
//! - [`HierarchyMap`] -- Type to direct-parent mapping of the new version

pub mod element;
pub mod error;
pub mod hierarchy;
pub mod snapshot;

pub use element::{Element, ElementId, ElementKind, Identity, Obligation};
pub use error::ModelError;
pub use hierarchy::HierarchyMap;
pub use snapshot::Snapshot;
