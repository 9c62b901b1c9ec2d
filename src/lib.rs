//! Load, merge and summarize per-region solar irradiance and weather datasets.
//!
//! The crate covers the data side of a solar resource comparison dashboard:
//!
//! * [`RegionRegistry`] maps region labels to cleaned CSV files.
//! * [`DatasetLoader`] reads one or more regions, optionally replacing a region's file
//!   with uploaded content ([`Overrides`]) and sampling rows deterministically, and
//!   returns a [`CombinedTable`] tagged with a `region` column.
//! * [`summarize`] ranks regions by the mean of a metric, with median, standard
//!   deviation and 95th percentile.
//! * [`format_metric_value`] renders statistics for display.
//! * [`SolarCompare`] runs the whole cycle behind a size-bounded cache.

mod dataset;
mod error;
mod filtering;
mod format;
mod regions;
mod solar_compare;
mod summary;
mod types;

#[cfg(test)]
mod test_utils;

pub use error::SolarCompareError;
pub use solar_compare::*;

pub use dataset::cache::{CachedLoader, LoadCache, LoadKey, DEFAULT_CACHE_CAPACITY};
pub use dataset::combined_table::{CombinedTable, SkippedRegion, REGION_COLUMN};
pub use dataset::error::DatasetError;
pub use dataset::loader::DatasetLoader;
pub use dataset::overrides::{OverrideSource, Overrides};
pub use dataset::sampling::DEFAULT_SEED;
pub use dataset::timestamp::TIMESTAMP_COLUMN;

pub use filtering::{filter_by_dates, timestamp_bounds, DateWindow, TimestampFilterExt};
pub use format::{format_metric_value, format_summary, FormattedSummaryRow, MISSING_PLACEHOLDER};

pub use regions::error::RegistryError;
pub use regions::registry::RegionRegistry;

pub use summary::error::SummaryError;
pub use summary::summarizer::{summarize, top_region, SummaryRow, TopRegion};

pub use types::metric::{Metric, UnknownMetricName, METRICS};
pub use types::region::Region;
