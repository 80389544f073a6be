use thiserror::Error;

use crate::api::jobs::ServiceError;
use crate::config::ConfigError;
use crate::registry::RegistryError;
use crate::store::StoreError;

/// Startup and command-line failures. All of these end the process.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("seen-set error: {0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Service(#[from] ServiceError),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("failed to encode output: {0}")]
    Output(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
