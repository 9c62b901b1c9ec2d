use polars::error::PolarsError;
use polars::prelude::DataType;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("Metric '{metric}' not found in table columns: {available:?}")]
    UnknownMetric {
        metric: String,
        available: Vec<String>,
    },

    #[error("Metric '{metric}' has non-numeric type {dtype}")]
    NonNumericMetric { metric: String, dtype: DataType },

    #[error("Table has no '{0}' column to group by")]
    MissingRegionColumn(String),

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),
}
