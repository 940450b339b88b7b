//! # materials-search
//!
//! Aggregated keyword/property search over materials records from two
//! providers: a locally cached bulk dataset and a remote property service.
//!
//! ## Design
//!
//! - Both providers are queried concurrently, each on its own task
//! - A failing provider contributes nothing; the other is unaffected
//! - Records are deduplicated by identity key, first writer wins
//! - Results are ranked by a simple lexical/source score (stable sort)
//! - Numeric range filters are inclusive, and a record missing the
//!   filtered property is excluded
//! - The local dataset is loaded once, lazily, and never invalidated
//!
//! Only malformed queries produce an error; provider faults are logged and
//! contained.

pub mod config;
pub mod error;
pub mod http;
pub mod orchestrator;
pub mod provider;
pub mod providers;
pub mod query;
pub mod types;

pub use config::{LocalConfig, RemoteConfig, SearchConfig};
pub use error::{Result, SearchError};
pub use orchestrator::Aggregator;
pub use provider::MaterialsProvider;
pub use providers::{LocalProvider, RemoteProvider};
pub use query::{DatasetScope, RangeFilter, SearchParams, SearchQuery};
pub use types::{PropValue, Record, SearchResult, Source};

/// Parse primitive parameters and search with `aggregator`.
///
/// Convenience wrapper around [`Aggregator::search_params`].
///
/// # Errors
///
/// Returns [`SearchError::InvalidInput`] if `params` is malformed.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> materials_search::Result<()> {
/// let aggregator = materials_search::Aggregator::from_config(
///     &materials_search::SearchConfig::default().with_env_overrides(),
/// )?;
/// let params = materials_search::SearchParams {
///     q: Some("Al2O3".into()),
///     band_gap_min: Some("1".into()),
///     ..Default::default()
/// };
/// let page = materials_search::search(&aggregator, &params).await?;
/// for record in &page.items {
///     println!("{} ({})", record.formula, record.source);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(aggregator: &Aggregator, params: &SearchParams) -> Result<SearchResult> {
    aggregator.search_params(params).await
}
