use crate::dataset::combined_table::REGION_COLUMN;
use crate::summary::error::SummaryError;
use ordered_float::OrderedFloat;
use polars::prelude::*;
use std::cmp::Ordering;
use std::fmt;

const COUNT: &str = "count";
const MEAN: &str = "mean";
const MEDIAN: &str = "median";
const STD: &str = "std";
const P95: &str = "p95";

/// Descriptive statistics of one metric for one region.
///
/// Each statistic is `None` when it cannot be computed: no values at all, or
/// (for `std`) fewer than two values.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub region: String,
    /// Number of non-missing values the statistics were computed from.
    pub count: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    /// Sample standard deviation.
    pub std: Option<f64>,
    /// 95th percentile, linearly interpolated.
    pub p95: Option<f64>,
}

/// The region with the highest mean, as shown in the "Highest mean" headline.
#[derive(Debug, Clone, PartialEq)]
pub struct TopRegion {
    pub region: String,
    pub mean: f64,
}

impl fmt::Display for TopRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.1})", self.region, self.mean)
    }
}

/// Computes per-region statistics of `metric`, ranked by mean (highest first).
///
/// Rows are grouped by the [`REGION_COLUMN`] column. Null and NaN values are
/// ignored. Regions with equal means keep the order in which they first appear
/// in `frame`; regions without any value are listed last.
///
/// # Errors
///
/// * [`SummaryError::UnknownMetric`] if `metric` is not a column of `frame`.
/// * [`SummaryError::NonNumericMetric`] if `metric` holds text or other non-numeric data.
/// * [`SummaryError::MissingRegionColumn`] if `frame` was not produced by the loader.
///
/// # Examples
///
/// ```
/// use polars::prelude::*;
/// use solar_compare::{summarize, REGION_COLUMN};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let frame = df!(
///     REGION_COLUMN => ["Benin", "Benin", "Togo"],
///     "GHI" => [200.0, 400.0, 350.0],
/// )?;
/// let summary = summarize(&frame, "GHI")?;
/// assert_eq!(summary[0].region, "Togo");
/// assert_eq!(summary[1].mean, Some(300.0));
/// # Ok(())
/// # }
/// ```
pub fn summarize(frame: &DataFrame, metric: &str) -> Result<Vec<SummaryRow>, SummaryError> {
    let Ok(values) = frame.column(metric) else {
        return Err(SummaryError::UnknownMetric {
            metric: metric.to_string(),
            available: frame
                .get_column_names()
                .iter()
                .map(|name| name.to_string())
                .collect(),
        });
    };
    let dtype = values.dtype();
    if !(dtype.is_primitive_numeric() || dtype.is_temporal() || dtype == &DataType::Null) {
        return Err(SummaryError::NonNumericMetric {
            metric: metric.to_string(),
            dtype: dtype.clone(),
        });
    }
    if frame.column(REGION_COLUMN).is_err() {
        return Err(SummaryError::MissingRegionColumn(REGION_COLUMN.to_string()));
    }

    let value = col(metric).cast(DataType::Float64).fill_nan(lit(NULL));
    let stats = frame
        .clone()
        .lazy()
        .filter(col(REGION_COLUMN).is_not_null())
        .group_by_stable([col(REGION_COLUMN)])
        .agg([
            value.clone().count().cast(DataType::UInt64).alias(COUNT),
            value.clone().mean().alias(MEAN),
            value.clone().median().alias(MEDIAN),
            value.clone().std(1).alias(STD),
            value
                .quantile(lit(0.95), QuantileMethod::Linear)
                .alias(P95),
        ])
        .collect()?;

    let regions = stats.column(REGION_COLUMN)?.str()?;
    let counts = stats.column(COUNT)?.u64()?;
    let means = stats.column(MEAN)?.f64()?;
    let medians = stats.column(MEDIAN)?.f64()?;
    let stds = stats.column(STD)?.f64()?;
    let p95s = stats.column(P95)?.f64()?;

    let mut rows: Vec<SummaryRow> = (0..stats.height())
        .map(|i| SummaryRow {
            region: regions.get(i).unwrap_or_default().to_string(),
            count: counts.get(i).unwrap_or(0) as usize,
            mean: means.get(i),
            median: medians.get(i),
            std: stds.get(i),
            p95: p95s.get(i),
        })
        .collect();
    // Stable sort: equal means keep first-appearance order.
    rows.sort_by(by_mean_descending);
    Ok(rows)
}

/// The first summary row, if it has a mean.
pub fn top_region(summary: &[SummaryRow]) -> Option<TopRegion> {
    let first = summary.first()?;
    Some(TopRegion {
        region: first.region.clone(),
        mean: first.mean?,
    })
}

fn by_mean_descending(a: &SummaryRow, b: &SummaryRow) -> Ordering {
    match (a.mean.map(OrderedFloat), b.mean.map(OrderedFloat)) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
