//! Error types for the materials-search crate.
//!
//! Only [`SearchError::InvalidInput`] ever reaches a caller of the
//! aggregator. Provider and load faults are contained at the provider
//! boundary and degrade to an empty contribution. No API keys appear in
//! error messages.

/// Errors that can occur while answering a materials query.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The query itself is malformed (non-numeric bound, unknown dataset).
    /// A client-input fault, surfaced to the caller.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Transport-level failure talking to the remote service.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The remote service answered with a non-success status.
    #[error("remote returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, kept for diagnosis.
        body: String,
    },

    /// A provider response could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),

    /// The local dataset failed to load. Sticky for the process lifetime.
    #[error("dataset load error: {0}")]
    Load(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl SearchError {
    /// Whether this error is a client-input fault rather than a provider fault.
    pub fn is_input_fault(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

/// Convenience type alias for materials-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
