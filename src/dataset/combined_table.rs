use polars::prelude::*;
use std::path::PathBuf;

/// Name of the column the loader adds to tag every row with its region label.
pub const REGION_COLUMN: &str = "region";

/// A region left out of a load because its dataset file does not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRegion {
    pub region: String,
    pub path: PathBuf,
}

/// Rows from one or more regional datasets, tagged with a [`REGION_COLUMN`] column.
///
/// Regions appear in the order they were requested and each region's rows keep
/// their original relative order. When none of the requested regions produced
/// any rows, `frame` is an empty `DataFrame`: callers should check
/// [`CombinedTable::is_empty`] and show a "nothing to display" state.
#[derive(Debug, Clone)]
pub struct CombinedTable {
    /// The merged data.
    pub frame: DataFrame,
    /// Regions that were requested but skipped because their file was missing.
    pub skipped: Vec<SkippedRegion>,
}

impl CombinedTable {
    pub fn new(frame: DataFrame, skipped: Vec<SkippedRegion>) -> Self {
        Self { frame, skipped }
    }

    pub fn empty(skipped: Vec<SkippedRegion>) -> Self {
        Self::new(DataFrame::empty(), skipped)
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// The first `rows` rows, for a raw data preview.
    pub fn preview(&self, rows: usize) -> DataFrame {
        self.frame.head(Some(rows))
    }

    /// Distinct region labels in order of first appearance.
    pub fn regions(&self) -> PolarsResult<Vec<String>> {
        if self.is_empty() {
            return Ok(Vec::new());
        }
        let mut labels: Vec<String> = Vec::new();
        for label in self.frame.column(REGION_COLUMN)?.str()?.into_iter().flatten() {
            if !labels.iter().any(|seen| seen == label) {
                labels.push(label.to_string());
            }
        }
        Ok(labels)
    }
}
