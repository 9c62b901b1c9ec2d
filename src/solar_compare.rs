//! The entry point a dashboard calls once per user interaction.
//!
//! [`SolarCompare`] owns the region registry and a cached loader. Each call to
//! [`SolarCompare::compare`] loads the selected regions, optionally restricts them
//! to a date window, summarizes the selected metric and formats the results.

use crate::dataset::cache::{CachedLoader, DEFAULT_CACHE_CAPACITY};
use crate::dataset::combined_table::{CombinedTable, SkippedRegion};
use crate::dataset::loader::DatasetLoader;
use crate::dataset::overrides::Overrides;
use crate::dataset::sampling::DEFAULT_SEED;
use crate::dataset::timestamp::TIMESTAMP_COLUMN;
use crate::error::SolarCompareError;
use crate::filtering::{filter_by_dates, timestamp_bounds, DateWindow};
use crate::format::{format_summary, FormattedSummaryRow};
use crate::regions::registry::RegionRegistry;
use crate::summary::summarizer::{summarize, top_region, SummaryRow, TopRegion};
use bon::bon;
use chrono::NaiveDate;
use log::{info, warn};
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};

/// Number of rows offered in the raw data preview.
pub const RAW_PREVIEW_ROWS: usize = 1_000;

/// What happened to the requested date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFilterOutcome {
    /// No window was requested.
    NotRequested,
    /// Rows outside the window were removed.
    Applied(DateWindow),
    /// The window was reversed; the data was left unfiltered and the user should be told.
    Rejected { start: NaiveDate, end: NaiveDate },
    /// The data has no `Timestamp` column, so it was left unfiltered.
    NoTimestamp,
}

/// Everything a dashboard needs to render one comparison.
#[derive(Debug, Clone)]
pub struct ComparisonReport {
    /// The combined rows after date filtering, for charts.
    pub table: DataFrame,
    /// Statistics per region, highest mean first.
    pub summary: Vec<SummaryRow>,
    /// `summary` rendered for a results table.
    pub formatted: Vec<FormattedSummaryRow>,
    /// Headline region with the highest mean, if any region had values.
    pub top_region: Option<TopRegion>,
    pub date_filter: DateFilterOutcome,
    /// Date span of the loaded data before filtering, for a date picker.
    pub available_dates: Option<DateWindow>,
    /// Regions whose dataset file was missing.
    pub skipped: Vec<SkippedRegion>,
}

impl ComparisonReport {
    /// The first [`RAW_PREVIEW_ROWS`] rows of the filtered table.
    pub fn preview(&self) -> DataFrame {
        self.table.head(Some(RAW_PREVIEW_ROWS))
    }
}

/// The outcome of [`SolarCompare::compare`].
#[derive(Debug, Clone)]
pub enum Comparison {
    /// None of the requested regions had any data. Dashboards show a
    /// "nothing to display" message instead of charts.
    Empty { skipped: Vec<SkippedRegion> },
    Ready(Box<ComparisonReport>),
}

impl Comparison {
    pub fn is_empty(&self) -> bool {
        matches!(self, Comparison::Empty { .. })
    }

    pub fn report(&self) -> Option<&ComparisonReport> {
        match self {
            Comparison::Ready(report) => Some(report.as_ref()),
            Comparison::Empty { .. } => None,
        }
    }
}

/// Compares solar and weather metrics across regional datasets.
///
/// # Examples
///
/// ```no_run
/// use solar_compare::{Metric, SolarCompare, SolarCompareError};
///
/// # fn main() -> Result<(), SolarCompareError> {
/// let client = SolarCompare::new();
/// let comparison = client
///     .compare()
///     .regions(&["Benin (Malanville)", "Togo (Dapaong)"])
///     .metric(Metric::Ghi.column_name())
///     .sample_size(5_000)
///     .call()?;
///
/// if let Some(report) = comparison.report() {
///     for row in &report.formatted {
///         println!("{}: mean {} / p95 {}", row.region, row.mean, row.p95);
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SolarCompare {
    loader: CachedLoader,
}

#[bon]
impl SolarCompare {
    /// Creates a client over the default registry, with dataset paths relative
    /// to the working directory.
    pub fn new() -> Self {
        Self::from_registry(RegionRegistry::default(), DEFAULT_CACHE_CAPACITY, DEFAULT_SEED)
    }

    /// Creates a client over the default registry rooted at `data_dir`.
    pub fn with_data_dir(data_dir: &Path) -> Self {
        Self::from_registry(
            RegionRegistry::default().with_data_dir(data_dir),
            DEFAULT_CACHE_CAPACITY,
            DEFAULT_SEED,
        )
    }

    /// Creates a client with explicit settings.
    ///
    /// # Arguments
    ///
    /// * `.registry(RegionRegistry)`: Optional. Region mapping to use. Defaults to the built-in three regions.
    /// * `.registry_file(PathBuf)`: Optional. JSON file to read the registry from; takes precedence over `.registry()`.
    /// * `.data_dir(PathBuf)`: Optional. Root for relative dataset paths.
    /// * `.cache_capacity(usize)`: Optional. Number of loaded tables kept in memory. Defaults to 8; 0 disables caching.
    /// * `.seed(u64)`: Optional. Seed for row sampling. Defaults to 42.
    ///
    /// # Errors
    ///
    /// Returns [`SolarCompareError::Registry`] if `registry_file` cannot be read or parsed.
    ///
    /// # Examples
    ///
    /// ```
    /// use solar_compare::SolarCompare;
    ///
    /// let client = SolarCompare::configure()
    ///     .data_dir("/srv/solar".into())
    ///     .cache_capacity(2)
    ///     .call()
    ///     .unwrap();
    /// assert_eq!(client.region_labels().len(), 3);
    /// ```
    #[builder]
    pub fn configure(
        registry: Option<RegionRegistry>,
        registry_file: Option<PathBuf>,
        data_dir: Option<PathBuf>,
        cache_capacity: Option<usize>,
        seed: Option<u64>,
    ) -> Result<Self, SolarCompareError> {
        let mut registry = match registry_file {
            Some(path) => RegionRegistry::from_json_file(&path)?,
            None => registry.unwrap_or_default(),
        };
        if let Some(data_dir) = data_dir {
            registry = registry.with_data_dir(&data_dir);
        }
        Ok(Self::from_registry(
            registry,
            cache_capacity.unwrap_or(DEFAULT_CACHE_CAPACITY),
            seed.unwrap_or(DEFAULT_SEED),
        ))
    }

    fn from_registry(registry: RegionRegistry, cache_capacity: usize, seed: u64) -> Self {
        let loader = DatasetLoader::new(registry).with_seed(seed);
        Self {
            loader: CachedLoader::new(loader, cache_capacity),
        }
    }

    pub fn registry(&self) -> &RegionRegistry {
        self.loader.loader().registry()
    }

    /// Labels for a region picker, in registry order.
    pub fn region_labels(&self) -> Vec<&str> {
        self.registry().labels().collect()
    }

    /// Loads the combined table without summarizing it. Uses the same cache as [`SolarCompare::compare`].
    #[builder]
    pub fn load(
        &self,
        regions: &[&str],
        sample_size: Option<usize>,
        overrides: Option<&Overrides>,
    ) -> Result<CombinedTable, SolarCompareError> {
        Ok(self
            .loader
            .load()
            .regions(regions)
            .maybe_sample_size(sample_size)
            .maybe_overrides(overrides)
            .call()?)
    }

    /// Runs one full load → filter → summarize → format cycle.
    ///
    /// # Arguments
    ///
    /// * `.regions(&[&str])`: **Required.** Region labels to compare.
    /// * `.metric(&str)`: **Required.** Metric column to summarize, e.g. `"GHI"`.
    /// * `.sample_size(usize)`: Optional. Maximum rows per region.
    /// * `.overrides(&Overrides)`: Optional. Uploaded replacements for region datasets.
    /// * `.date_range((NaiveDate, NaiveDate))`: Optional. Inclusive date window. A reversed
    ///   window does not fail the request; it is reported as [`DateFilterOutcome::Rejected`].
    ///
    /// # Returns
    ///
    /// [`Comparison::Empty`] when no requested region had data, otherwise a report.
    ///
    /// # Errors
    ///
    /// * [`SolarCompareError::Dataset`] for unknown regions, malformed uploads or unreadable files.
    /// * [`SolarCompareError::Summary`] when `metric` is not a column of the loaded data.
    #[builder]
    pub fn compare(
        &self,
        regions: &[&str],
        metric: &str,
        sample_size: Option<usize>,
        overrides: Option<&Overrides>,
        date_range: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<Comparison, SolarCompareError> {
        let CombinedTable { frame, skipped } = self
            .load()
            .regions(regions)
            .maybe_sample_size(sample_size)
            .maybe_overrides(overrides)
            .call()?;
        if frame.height() == 0 {
            warn!("No data available for regions {:?}", regions);
            return Ok(Comparison::Empty { skipped });
        }

        let available_dates = timestamp_bounds(&frame)?;
        let (table, date_filter) = match date_range {
            None => (frame, DateFilterOutcome::NotRequested),
            Some(_) if frame.column(TIMESTAMP_COLUMN).is_err() => {
                (frame, DateFilterOutcome::NoTimestamp)
            }
            Some((start, end)) => match DateWindow::new(start, end) {
                Ok(window) => (filter_by_dates(&frame, window)?, DateFilterOutcome::Applied(window)),
                Err(e) => {
                    warn!("{}; showing unfiltered data", e);
                    (frame, DateFilterOutcome::Rejected { start, end })
                }
            },
        };

        let summary = summarize(&table, metric)?;
        let formatted = format_summary(&summary);
        let top_region = top_region(&summary);
        info!(
            "Compared {} across {} regions ({} rows)",
            metric,
            summary.len(),
            table.height()
        );

        Ok(Comparison::Ready(Box::new(ComparisonReport {
            table,
            summary,
            formatted,
            top_region,
            date_filter,
            available_dates,
            skipped,
        })))
    }

    /// Drops cached tables that include `region`, e.g. after its dataset file was replaced.
    pub fn invalidate_region(&self, region: &str) -> usize {
        self.loader.invalidate_region(region)
    }

    pub fn clear_cache(&self) {
        self.loader.clear();
    }
}

impl Default for SolarCompare {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::error::SummaryError;
    use crate::test_utils::{region_csv, registry_with_files, sequence};
    use std::error::Error;
    use tempfile::TempDir;

    const BENIN: &str = "Benin (Malanville)";
    const SIERRA_LEONE: &str = "Sierra Leone (Bumbuna)";
    const TOGO: &str = "Togo (Dapaong)";

    fn client(dir: &TempDir) -> Result<SolarCompare, Box<dyn Error>> {
        let registry = registry_with_files(
            dir.path(),
            &[
                (BENIN, "benin.csv", &region_csv(&[10.0, 10.0])),
                (SIERRA_LEONE, "sl.csv", &region_csv(&[20.0, 30.0])),
                (TOGO, "togo.csv", &region_csv(&[5.0])),
            ],
        )?;
        Ok(SolarCompare::configure().registry(registry).call()?)
    }

    fn ready(comparison: Comparison) -> ComparisonReport {
        match comparison {
            Comparison::Ready(report) => *report,
            Comparison::Empty { .. } => panic!("expected a report"),
        }
    }

    #[test]
    fn ranks_regions_and_formats_summary() -> Result<(), Box<dyn Error>> {
        let dir = TempDir::new()?;
        let client = client(&dir)?;

        let report = ready(
            client
                .compare()
                .regions(&[BENIN, SIERRA_LEONE, TOGO])
                .metric("GHI")
                .call()?,
        );

        let order: Vec<&str> = report.summary.iter().map(|r| r.region.as_str()).collect();
        assert_eq!(order, vec![SIERRA_LEONE, BENIN, TOGO]);
        assert_eq!(report.formatted[0].mean, "25.00");
        assert_eq!(report.formatted[2].std, "–");
        assert_eq!(
            report.top_region.map(|t| t.to_string()),
            Some("Sierra Leone (Bumbuna) (25.0)".to_string())
        );
        assert_eq!(report.table.height(), 5);
        assert_eq!(report.date_filter, DateFilterOutcome::NotRequested);
        Ok(())
    }

    #[test]
    fn everything_missing_is_empty_not_an_error() -> Result<(), Box<dyn Error>> {
        let dir = TempDir::new()?;
        let client = client(&dir)?;
        std::fs::remove_file(dir.path().join("togo.csv"))?;

        let comparison = client.compare().regions(&[TOGO]).metric("GHI").call()?;
        assert!(comparison.is_empty());
        assert!(matches!(comparison, Comparison::Empty { skipped } if skipped.len() == 1));
        Ok(())
    }

    #[test]
    fn unknown_metric_is_surfaced() -> Result<(), Box<dyn Error>> {
        let dir = TempDir::new()?;
        let client = client(&dir)?;

        let result = client.compare().regions(&[BENIN]).metric("DNI").call();
        assert!(matches!(
            result,
            Err(SolarCompareError::Summary(SummaryError::UnknownMetric { metric, .. })) if metric == "DNI"
        ));
        Ok(())
    }

    #[test]
    fn reversed_date_window_leaves_data_unfiltered() -> Result<(), Box<dyn Error>> {
        let dir = TempDir::new()?;
        let client = client(&dir)?;
        let start = NaiveDate::from_ymd_opt(2022, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();

        let report = ready(
            client
                .compare()
                .regions(&[SIERRA_LEONE])
                .metric("GHI")
                .date_range((start, end))
                .call()?,
        );
        assert_eq!(report.date_filter, DateFilterOutcome::Rejected { start, end });
        assert_eq!(report.table.height(), 2);
        Ok(())
    }

    #[test]
    fn date_window_restricts_rows() -> Result<(), Box<dyn Error>> {
        let dir = TempDir::new()?;
        let registry = registry_with_files(
            dir.path(),
            &[(TOGO, "togo.csv", &region_csv(&sequence(1.0, 48)))],
        )?;
        let client = SolarCompare::configure().registry(registry).call()?;
        let day_two = NaiveDate::from_ymd_opt(2022, 1, 2).unwrap();

        let report = ready(
            client
                .compare()
                .regions(&[TOGO])
                .metric("GHI")
                .date_range((day_two, day_two))
                .call()?,
        );

        assert_eq!(report.table.height(), 24);
        assert_eq!(report.summary[0].mean, Some(36.5));
        assert!(matches!(report.date_filter, DateFilterOutcome::Applied(_)));
        assert_eq!(
            report.available_dates,
            Some(DateWindow::new(
                NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
                day_two
            )?)
        );
        Ok(())
    }

    #[test]
    fn repeated_requests_are_served_from_cache() -> Result<(), Box<dyn Error>> {
        let dir = TempDir::new()?;
        let client = client(&dir)?;

        client.compare().regions(&[BENIN]).metric("GHI").call()?;
        std::fs::remove_file(dir.path().join("benin.csv"))?;
        let cached = client.compare().regions(&[BENIN]).metric("GHI").call()?;
        assert!(!cached.is_empty());

        assert_eq!(client.invalidate_region(BENIN), 1);
        let reloaded = client.compare().regions(&[BENIN]).metric("GHI").call()?;
        assert!(reloaded.is_empty());
        Ok(())
    }

    #[test]
    fn registry_file_configures_regions() -> Result<(), Box<dyn Error>> {
        let dir = TempDir::new()?;
        std::fs::write(dir.path().join("kenya.csv"), region_csv(&[3.0, 4.0]))?;
        let config = dir.path().join("regions.json");
        std::fs::write(&config, r#"[{"label": "Kenya (Garissa)", "path": "kenya.csv"}]"#)?;

        let client = SolarCompare::configure()
            .registry_file(config)
            .data_dir(dir.path().to_path_buf())
            .call()?;
        assert_eq!(client.region_labels(), vec!["Kenya (Garissa)"]);

        let report = ready(
            client
                .compare()
                .regions(&["Kenya (Garissa)"])
                .metric("GHI")
                .call()?,
        );
        assert_eq!(report.summary[0].mean, Some(3.5));
        Ok(())
    }
}
