//! Diff engine for apidelta.
//!
//! Reconciles the old and new [`Snapshot`](apidelta_types::Snapshot) of a
//! library's public surface into one sorted list of changes, ready for a
//! compatibility report.
//!
//! # Key Types
//!
//! - [`ApiDiff`] / [`DiffEntry`] -- Ordered `(Element, Option<ChangeRecord>)` entries
//! - [`ChangeRecord`] / [`FieldChange`] -- What changed on one element, and its rendering
//! - [`ChangeStatus`] -- Added, removed or changed
//! - [`DiffConfig`] -- Reporting policy switches

pub mod api_diff;
pub mod change_record;
pub mod config;
pub mod error;

pub use api_diff::{diff, diff_checked, diff_with_config, ApiDiff, DiffEntry};
pub use change_record::{ChangeRecord, ChangeStatus, FieldChange, SEGMENT_SEPARATOR};
pub use config::DiffConfig;
pub use error::{DiffError, DiffResult};
