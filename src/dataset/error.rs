use crate::regions::error::RegistryError;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    // Recovered by the loader: the region is skipped and the load continues.
    #[error("Dataset for region '{region}' is missing: {path}")]
    MissingDataset { region: String, path: PathBuf },

    #[error("Uploaded data for region '{region}' is not usable CSV: {message}")]
    MalformedInput { region: String, message: String },

    #[error("Failed to read CSV dataset '{path}' for region '{region}'")]
    CsvRead {
        region: String,
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    #[error("Dataset for region '{region}' has none of the metric columns")]
    MissingColumns { region: String },

    #[error("Columns of region '{region}' do not match the previously loaded regions")]
    SchemaMismatch {
        region: String,
        #[source]
        source: PolarsError,
    },

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),
}
