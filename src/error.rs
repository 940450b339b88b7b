//! Error types for the aim-materials host.

use materials_search::SearchError;

/// Top-level error type for the headless host.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// Configuration file could not be parsed or is invalid.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Search core could not be constructed.
    #[error("search error: {0}")]
    Search(#[from] SearchError),

    /// Reading or writing the stdio protocol channel failed.
    #[error("channel error: {0}")]
    Channel(String),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, HostError>;
