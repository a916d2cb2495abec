//! Error types for palette loading.

use thiserror::Error;

/// Errors that can occur while loading palette data.
#[derive(Debug, Error)]
pub enum Error {
    /// The palette data source was not valid JSON of the expected shape.
    #[error("Invalid palette data: {0}")]
    InvalidData(#[from] serde_json::Error),
}

/// Result type for palette operations.
pub type Result<T> = std::result::Result<T, Error>;
