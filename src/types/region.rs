//! Defines a single entry of the region registry.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A labelled regional dataset and the CSV file that holds it.
///
/// Entries are immutable once registered; see [`crate::RegionRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Human-readable label shown in region pickers, e.g. "Benin (Malanville)".
    pub label: String,
    /// Location of the cleaned CSV file. Relative paths are resolved against
    /// the working directory unless the registry was re-rooted.
    pub path: PathBuf,
}

impl Region {
    pub fn new(label: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
        }
    }
}
