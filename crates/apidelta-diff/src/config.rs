use serde::{Deserialize, Serialize};

use crate::error::{DiffError, DiffResult};

/// Policy switches for a diff run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Leave out elements that are new in this version and already
    /// deprecated. Such elements are expected to disappear before release,
    /// so they carry no compatibility information.
    pub suppress_deprecated_additions: bool,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            suppress_deprecated_additions: true,
        }
    }
}

impl DiffConfig {
    /// Report every addition, deprecated or not.
    pub fn report_all_additions() -> Self {
        Self {
            suppress_deprecated_additions: false,
        }
    }

    /// Parse a configuration from TOML. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> DiffResult<Self> {
        toml::from_str(s).map_err(|e| DiffError::Config(e.to_string()))
    }
}
