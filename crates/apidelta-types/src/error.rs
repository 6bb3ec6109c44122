use thiserror::Error;

use crate::element::{ElementId, ElementKind};

/// Errors produced when assembling model values at the extraction boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("duplicate {kind} `{java_name}` in snapshot (container: {container:?})")]
    DuplicateIdentity {
        kind: ElementKind,
        container: Option<ElementId>,
        java_name: String,
    },

    #[error("hierarchy entry {child} -> {parent} names a type absent from the snapshot: {missing}")]
    UnknownType {
        child: ElementId,
        parent: ElementId,
        missing: ElementId,
    },

    #[error("serialization error: {0}")]
    Serialization(String),
}
