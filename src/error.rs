use crate::dataset::error::DatasetError;
use crate::regions::error::RegistryError;
use crate::summary::error::SummaryError;
use chrono::NaiveDate;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SolarCompareError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Summary(#[from] SummaryError),

    #[error("Start date {start} must be before end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Polars operation failed: {0}")]
    PolarsError(#[from] PolarsError),
}
