//! A size-bounded read-through cache in front of [`DatasetLoader`].
//!
//! Entries are keyed by the exact request: region labels in request order, the
//! sample size and the fingerprints of the overrides that apply to those regions.
//! The least recently used entry is evicted once `capacity` is reached, and
//! entries can be dropped explicitly with [`LoadCache::invalidate`],
//! [`LoadCache::invalidate_region`] or [`LoadCache::clear`].

use crate::dataset::combined_table::CombinedTable;
use crate::dataset::error::DatasetError;
use crate::dataset::loader::DatasetLoader;
use crate::dataset::overrides::Overrides;
use bon::bon;
use log::{debug, info};
use std::collections::{hash_map::Entry, HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

pub const DEFAULT_CACHE_CAPACITY: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoadKey {
    regions: Vec<String>,
    sample_size: Option<usize>,
    overrides: Vec<(String, [u8; 32])>,
}

impl LoadKey {
    pub fn new(regions: &[&str], sample_size: Option<usize>, overrides: Option<&Overrides>) -> Self {
        let mut unique: Vec<&str> = Vec::with_capacity(regions.len());
        for &region in regions {
            if !unique.contains(&region) {
                unique.push(region);
            }
        }
        Self {
            overrides: overrides
                .map(|o| o.fingerprints_for(&unique))
                .unwrap_or_default(),
            regions: unique.into_iter().map(str::to_string).collect(),
            sample_size,
        }
    }

    pub fn mentions(&self, region: &str) -> bool {
        self.regions.iter().any(|r| r == region)
    }
}

#[derive(Debug)]
pub struct LoadCache {
    capacity: usize,
    entries: HashMap<LoadKey, CombinedTable>,
    // Front is least recently used.
    recency: VecDeque<LoadKey>,
}

impl LoadCache {
    /// Creates a cache holding at most `capacity` tables. A capacity of zero disables caching.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            recency: VecDeque::with_capacity(capacity),
        }
    }

    pub fn get(&mut self, key: &LoadKey) -> Option<CombinedTable> {
        let table = self.entries.get(key)?.clone();
        self.touch(key);
        Some(table)
    }

    pub fn insert(&mut self, key: LoadKey, table: CombinedTable) {
        if self.capacity == 0 {
            return;
        }
        match self.entries.entry(key.clone()) {
            Entry::Occupied(mut entry) => {
                entry.insert(table);
                self.touch(&key);
            }
            Entry::Vacant(entry) => {
                entry.insert(table);
                self.recency.push_back(key);
            }
        }
        while self.entries.len() > self.capacity {
            let Some(oldest) = self.recency.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
            debug!("Evicted cached load for regions {:?}", oldest.regions);
        }
    }

    /// Drops the entry for `key`. Returns whether one was present.
    pub fn invalidate(&mut self, key: &LoadKey) -> bool {
        self.recency.retain(|k| k != key);
        self.entries.remove(key).is_some()
    }

    /// Drops every entry whose request included `region`, e.g. after its file was replaced.
    pub fn invalidate_region(&mut self, region: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.mentions(region));
        self.recency.retain(|key| !key.mentions(region));
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn touch(&mut self, key: &LoadKey) {
        if let Some(position) = self.recency.iter().position(|k| k == key) {
            if let Some(k) = self.recency.remove(position) {
                self.recency.push_back(k);
            }
        }
    }
}

/// A [`DatasetLoader`] with a [`LoadCache`] in front of it.
///
/// Tables are only cached when no region was skipped, so a dataset file that
/// shows up later is picked up by the next request.
#[derive(Debug)]
pub struct CachedLoader {
    loader: DatasetLoader,
    cache: Mutex<LoadCache>,
}

#[bon]
impl CachedLoader {
    pub fn new(loader: DatasetLoader, capacity: usize) -> Self {
        Self {
            loader,
            cache: Mutex::new(LoadCache::new(capacity)),
        }
    }

    pub fn loader(&self) -> &DatasetLoader {
        &self.loader
    }

    /// Same contract as [`DatasetLoader::load`], served from the cache when possible.
    #[builder]
    pub fn load(
        &self,
        regions: &[&str],
        sample_size: Option<usize>,
        overrides: Option<&Overrides>,
    ) -> Result<CombinedTable, DatasetError> {
        let key = LoadKey::new(regions, sample_size, overrides);

        if let Some(table) = self.lock().get(&key) {
            info!("Cache hit for regions {:?}", key.regions);
            return Ok(table);
        }
        debug!("Cache miss for regions {:?}", key.regions);

        // Loading happens without holding the lock.
        let table = self
            .loader
            .load()
            .regions(regions)
            .maybe_sample_size(sample_size)
            .maybe_overrides(overrides)
            .call()?;

        if table.skipped.is_empty() {
            self.lock().insert(key, table.clone());
        }
        Ok(table)
    }

    pub fn invalidate_region(&self, region: &str) -> usize {
        self.lock().invalidate_region(region)
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn cached_entries(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, LoadCache> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
