//! The region registry maps region labels to the CSV file holding their measurements.
//!
//! The registry is built once and never mutated afterwards. The default registry
//! contains the three cleaned station datasets; a different mapping can be loaded
//! from a JSON file without touching any loading logic.

use crate::regions::error::RegistryError;
use crate::types::region::Region;
use log::info;
use std::collections::HashSet;
use std::path::Path;

/// Read-only mapping from region label to dataset location.
///
/// Labels keep their registration order, which is the order region pickers
/// should present them in.
///
/// # Examples
///
/// ```
/// use solar_compare::RegionRegistry;
///
/// let registry = RegionRegistry::default();
/// assert_eq!(registry.labels().count(), 3);
/// assert!(registry.source_for("Togo (Dapaong)").is_ok());
/// assert!(registry.source_for("Atlantis").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionRegistry {
    regions: Vec<Region>,
}

impl RegionRegistry {
    /// Builds a registry from explicit entries.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateRegion`] if two entries share a label.
    pub fn new(regions: Vec<Region>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::with_capacity(regions.len());
        for region in &regions {
            if !seen.insert(region.label.as_str()) {
                return Err(RegistryError::DuplicateRegion(region.label.clone()));
            }
        }
        Ok(Self { regions })
    }

    /// Reads a registry from a JSON array of `{"label": ..., "path": ...}` objects.
    ///
    /// Relative dataset paths are kept as written; combine with
    /// [`RegionRegistry::with_data_dir`] to resolve them against another root.
    pub fn from_json_file(path: &Path) -> Result<Self, RegistryError> {
        let bytes =
            std::fs::read(path).map_err(|e| RegistryError::ConfigRead(path.to_path_buf(), e))?;
        let regions: Vec<Region> = serde_json::from_slice(&bytes)
            .map_err(|e| RegistryError::ConfigParse(path.to_path_buf(), e))?;
        info!(
            "Loaded {} regions from configuration {}",
            regions.len(),
            path.display()
        );
        Self::new(regions)
    }

    /// Returns a registry whose relative dataset paths are resolved against `data_dir`.
    /// Absolute paths are left untouched.
    pub fn with_data_dir(self, data_dir: &Path) -> Self {
        let regions = self
            .regions
            .into_iter()
            .map(|region| {
                let path = if region.path.is_absolute() {
                    region.path
                } else {
                    data_dir.join(region.path)
                };
                Region { path, ..region }
            })
            .collect();
        Self { regions }
    }

    /// Resolves a label to its dataset location.
    pub fn source_for(&self, label: &str) -> Result<&Path, RegistryError> {
        self.regions
            .iter()
            .find(|region| region.label == label)
            .map(|region| region.path.as_path())
            .ok_or_else(|| RegistryError::UnknownRegion(label.to_string()))
    }

    /// All registered labels, in registration order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.regions.iter().map(|region| region.label.as_str())
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn contains(&self, label: &str) -> bool {
        self.regions.iter().any(|region| region.label == label)
    }
}

impl Default for RegionRegistry {
    fn default() -> Self {
        Self {
            regions: vec![
                Region::new("Benin (Malanville)", "data/benin-malanville_clean.csv"),
                Region::new(
                    "Sierra Leone (Bumbuna)",
                    "data/sierraleone-bumbuna_clean.csv",
                ),
                Region::new("Togo (Dapaong)", "data/togo_clean.csv"),
            ],
        }
    }
}
