//! Trait definition for pluggable materials providers.
//!
//! The local dataset and the remote property service each implement
//! [`MaterialsProvider`], giving the aggregator a uniform way to ask
//! "given a query, produce candidate records, or fail".

use std::future::Future;

use crate::error::SearchError;
use crate::query::SearchQuery;
use crate::types::{Record, Source};

/// A source of normalized [`Record`] values.
///
/// All implementations must be `Send + Sync` so the aggregator can run
/// them as independent tasks.
pub trait MaterialsProvider: Send + Sync {
    /// Answer `query` with the records this provider holds.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] when the provider cannot answer: transport
    /// failure, non-success status, undecodable response, or a dataset that
    /// failed to load.
    fn query(
        &self,
        query: &SearchQuery,
    ) -> impl Future<Output = Result<Vec<Record>, SearchError>> + Send;

    /// Which [`Source`] this provider represents.
    fn source(&self) -> Source;

    /// Answer `query`, degrading any failure to an empty contribution.
    ///
    /// Faults are logged here so that nothing escapes the provider boundary.
    /// Load faults are logged at error level because they disable the local
    /// dataset for the rest of the process.
    fn collect(&self, query: &SearchQuery) -> impl Future<Output = Vec<Record>> + Send {
        async move {
            let source = self.source();
            match self.query(query).await {
                Ok(records) => records,
                Err(err @ SearchError::Load(_)) => {
                    tracing::error!(%source, error = %err, "provider dataset unavailable");
                    Vec::new()
                }
                Err(err) => {
                    tracing::warn!(%source, error = %err, "provider query failed");
                    Vec::new()
                }
            }
        }
    }
}
