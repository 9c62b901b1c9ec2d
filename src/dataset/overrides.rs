//! In-memory replacements for on-disk regional datasets.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;

/// Raw CSV content supplied for one region, typically an uploaded file.
#[derive(Clone, PartialEq, Eq)]
pub struct OverrideSource {
    bytes: Vec<u8>,
    fingerprint: [u8; 32],
}

impl OverrideSource {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        let fingerprint: [u8; 32] = Sha256::digest(&bytes).into();
        Self { bytes, fingerprint }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// SHA-256 of the content. Two uploads with identical bytes share a fingerprint.
    pub fn fingerprint(&self) -> [u8; 32] {
        self.fingerprint
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for OverrideSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverrideSource")
            .field("len", &self.bytes.len())
            .field("fingerprint", &hex(&self.fingerprint[..6]))
            .finish()
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Override sources keyed by region label.
///
/// # Examples
///
/// ```
/// use solar_compare::Overrides;
///
/// let mut overrides = Overrides::new();
/// overrides.insert("Togo (Dapaong)", "Timestamp,GHI\n2022-01-01 10:00,512.0\n");
/// assert!(overrides.get("Togo (Dapaong)").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    sources: HashMap<String, OverrideSource>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `bytes` as the dataset for `region`, replacing any earlier upload.
    pub fn insert(&mut self, region: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.sources
            .insert(region.into(), OverrideSource::new(bytes));
    }

    pub fn remove(&mut self, region: &str) -> Option<OverrideSource> {
        self.sources.remove(region)
    }

    pub fn get(&self, region: &str) -> Option<&OverrideSource> {
        self.sources.get(region)
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Fingerprints of the overrides that apply to `regions`, sorted by label.
    /// Uploads for regions outside the request do not change the result.
    pub(crate) fn fingerprints_for(&self, regions: &[&str]) -> Vec<(String, [u8; 32])> {
        let mut prints: Vec<(String, [u8; 32])> = regions
            .iter()
            .filter_map(|region| {
                self.sources
                    .get(*region)
                    .map(|source| (region.to_string(), source.fingerprint()))
            })
            .collect();
        prints.sort();
        prints.dedup();
        prints
    }
}

impl<K: Into<String>, V: Into<Vec<u8>>> FromIterator<(K, V)> for Overrides {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut overrides = Overrides::new();
        for (region, bytes) in iter {
            overrides.insert(region, bytes);
        }
        overrides
    }
}
