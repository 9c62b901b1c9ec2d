use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Unknown region '{0}'")]
    UnknownRegion(String),

    #[error("Region '{0}' is registered more than once")]
    DuplicateRegion(String),

    #[error("Failed to read region configuration '{0}'")]
    ConfigRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse region configuration '{0}'")]
    ConfigParse(PathBuf, #[source] serde_json::Error),
}
