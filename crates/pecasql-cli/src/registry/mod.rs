mod logging;
mod report;

pub use logging::init_logging;
pub use report::{RunReport, write_report};

use thiserror::Error;

/// Errors raised while setting up run artifacts.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("json serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("logging error: {0}")]
    Logging(String),
}

pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
