//! Core aggregator: concurrent fan-out, containment, dedup, rank, paginate.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::provider::MaterialsProvider;
use crate::providers::{LocalProvider, RemoteProvider};
use crate::query::{SearchParams, SearchQuery};
use crate::types::{Record, SearchResult, Source};

use super::dedup::deduplicate;
use super::paginate::{paginate, PageWindow};
use super::scoring::rank;

/// Answers queries by merging the local and remote providers.
///
/// The providers live as long as the aggregator, so the local dataset is
/// loaded at most once per aggregator.
pub struct Aggregator<L = LocalProvider, R = RemoteProvider> {
    local: Arc<L>,
    remote: Arc<R>,
}

impl<L, R> Clone for Aggregator<L, R> {
    fn clone(&self) -> Self {
        Self {
            local: Arc::clone(&self.local),
            remote: Arc::clone(&self.remote),
        }
    }
}

impl Aggregator {
    /// Build the default local + remote pair from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `config` is invalid, or
    /// [`SearchError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let local = LocalProvider::new(&config.local);
        let remote = RemoteProvider::new(config.remote.clone())?;
        if !remote.is_available() {
            tracing::info!("no remote API key configured; remote results disabled");
        }
        Ok(Self::new(local, remote))
    }
}

impl<L, R> Aggregator<L, R>
where
    L: MaterialsProvider + 'static,
    R: MaterialsProvider + 'static,
{
    pub fn new(local: L, remote: R) -> Self {
        Self {
            local: Arc::new(local),
            remote: Arc::new(remote),
        }
    }

    pub fn local(&self) -> &L {
        &self.local
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Run `query` against every provider in scope and return one page.
    ///
    /// # Pipeline
    ///
    /// 1. Spawn one task per in-scope provider; out-of-scope providers are
    ///    not invoked
    /// 2. Join both; a failed or panicked task contributes nothing
    /// 3. Merge local-then-remote
    /// 4. Deduplicate, first writer wins
    /// 5. Score and stable-sort by descending score
    /// 6. Slice the requested page
    ///
    /// Provider faults never surface here.
    pub async fn search(&self, query: &SearchQuery) -> SearchResult {
        let local_task = spawn_provider(&self.local, query);
        let remote_task = spawn_provider(&self.remote, query);

        let (local, remote) = futures::future::join(
            settle(Source::Local, local_task),
            settle(Source::Remote, remote_task),
        )
        .await;

        let mut merged: Vec<Record> = Vec::with_capacity(local.len() + remote.len());
        merged.extend(local);
        merged.extend(remote);

        let unique = deduplicate(merged);
        let needle = query.needle();
        let ranked = rank(unique, needle.as_deref());

        let result = paginate(ranked, PageWindow::new(query.page, query.page_size));
        tracing::debug!(
            dataset = %query.dataset,
            total = result.total,
            returned = result.items.len(),
            "search complete"
        );
        result
    }

    /// Parse primitive parameters, then [`search`](Self::search).
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidInput`] for a malformed query. This is
    /// the only error a caller can observe.
    pub async fn search_params(&self, params: &SearchParams) -> Result<SearchResult, SearchError> {
        let query = SearchQuery::from_params(params)?;
        Ok(self.search(&query).await)
    }
}

/// Start `provider` on its own task if the query's scope includes it.
fn spawn_provider<P>(provider: &Arc<P>, query: &SearchQuery) -> Option<JoinHandle<Vec<Record>>>
where
    P: MaterialsProvider + 'static,
{
    if !query.dataset.includes(provider.source()) {
        return None;
    }
    let provider = Arc::clone(provider);
    let query = query.clone();
    Some(tokio::spawn(async move { provider.collect(&query).await }))
}

/// Wait for a provider task, treating a missing or failed task as empty.
async fn settle(source: Source, task: Option<JoinHandle<Vec<Record>>>) -> Vec<Record> {
    let Some(task) = task else {
        return Vec::new();
    };
    match task.await {
        Ok(records) => {
            tracing::debug!(%source, count = records.len(), "provider returned records");
            records
        }
        Err(err) => {
            tracing::warn!(%source, error = %err, "provider task failed");
            Vec::new()
        }
    }
}
