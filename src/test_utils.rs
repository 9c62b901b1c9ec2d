//! Fixtures shared by the unit tests.

use crate::regions::registry::RegionRegistry;
use crate::types::region::Region;
use std::fmt::Write as _;
use std::path::Path;

/// CSV text with one row per value. `GHI` carries the value, `Tamb` a constant,
/// and the timestamps advance by one hour from 2022-01-01 00:00.
pub(crate) fn region_csv(ghi: &[f64]) -> String {
    let mut csv = String::from("Timestamp,GHI,Tamb\n");
    for (i, value) in ghi.iter().enumerate() {
        let day = 1 + i / 24;
        let hour = i % 24;
        // Writing into a String cannot fail.
        let _ = writeln!(csv, "2022-01-{day:02} {hour:02}:00,{value},25.5");
    }
    csv
}

/// Writes each `(label, file_name, csv)` into `dir` and registers it.
pub(crate) fn registry_with_files(
    dir: &Path,
    files: &[(&str, &str, &str)],
) -> std::io::Result<RegionRegistry> {
    let mut regions = Vec::with_capacity(files.len());
    for (label, file_name, csv) in files {
        let path = dir.join(file_name);
        std::fs::write(&path, csv)?;
        regions.push(Region::new(*label, path));
    }
    RegionRegistry::new(regions).map_err(std::io::Error::other)
}

pub(crate) fn sequence(start: f64, len: usize) -> Vec<f64> {
    (0..len).map(|i| start + i as f64).collect()
}
