//! Local provider over the bulk dataset file.
//!
//! The dataset is a JSON array of material entries. It is read and
//! normalized on the first query and then shared read-only for as long as
//! the provider lives; there is no invalidation path. A failed load is
//! remembered the same way, so the provider stays empty until restart.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::OnceCell;

use crate::config::LocalConfig;
use crate::error::SearchError;
use crate::provider::MaterialsProvider;
use crate::query::SearchQuery;
use crate::types::{finite, PropValue, Record, Source};

/// Outcome of the one-time dataset load. Failures keep their message.
type Loaded = Result<Arc<[Record]>, String>;

/// Provider answering queries from the in-memory local dataset.
pub struct LocalProvider {
    path: PathBuf,
    dataset: OnceCell<Loaded>,
}

impl LocalProvider {
    /// Create a provider that loads `config.dataset_path` on first use.
    pub fn new(config: &LocalConfig) -> Self {
        Self {
            path: config.dataset_path.clone(),
            dataset: OnceCell::new(),
        }
    }

    /// Create a provider over records that are already normalized.
    pub fn from_records(records: Vec<Record>) -> Self {
        Self {
            path: PathBuf::new(),
            dataset: OnceCell::new_with(Some(Ok(Arc::from(records)))),
        }
    }

    /// Whether the dataset has been loaded (successfully or not).
    pub fn is_loaded(&self) -> bool {
        self.dataset.initialized()
    }

    async fn dataset(&self) -> Result<Arc<[Record]>, SearchError> {
        let loaded = self
            .dataset
            .get_or_init(|| load_dataset(&self.path))
            .await;
        match loaded {
            Ok(records) => Ok(Arc::clone(records)),
            Err(msg) => Err(SearchError::Load(msg.clone())),
        }
    }
}

impl MaterialsProvider for LocalProvider {
    async fn query(&self, query: &SearchQuery) -> Result<Vec<Record>, SearchError> {
        let dataset = self.dataset().await?;
        let matched = filter_records(&dataset, query);
        tracing::trace!(
            candidates = dataset.len(),
            matched = matched.len(),
            "local dataset filtered"
        );
        Ok(matched)
    }

    fn source(&self) -> Source {
        Source::Local
    }
}

/// Apply the text filter and all three range filters.
fn filter_records(records: &[Record], query: &SearchQuery) -> Vec<Record> {
    let needle = query.needle();
    records
        .iter()
        .filter(|r| needle.as_deref().map_or(true, |n| r.matches_text(n)))
        .filter(|r| query.admits_ranges(r))
        .cloned()
        .collect()
}

async fn load_dataset(path: &Path) -> Loaded {
    let outcome = match tokio::fs::read_to_string(path).await {
        Ok(raw) => parse_dataset(&raw).map_err(|e| e.to_string()),
        Err(e) => Err(format!("failed to read {}: {e}", path.display())),
    };
    match outcome {
        Ok(records) => {
            tracing::info!(path = %path.display(), count = records.len(), "local dataset loaded");
            Ok(Arc::from(records))
        }
        Err(msg) => {
            tracing::error!(
                path = %path.display(),
                error = %msg,
                "local dataset failed to load; local results disabled until restart"
            );
            Err(msg)
        }
    }
}

/// A dataset entry as stored on disk. Everything but `formula` is optional.
#[derive(Debug, Deserialize)]
struct LocalEntry {
    id: Option<String>,
    #[serde(alias = "ml_id")]
    local_id: Option<String>,
    #[serde(alias = "mp_id")]
    remote_id: Option<String>,
    formula: Option<String>,
    name: Option<String>,
    spacegroup: Option<String>,
    band_gap: Option<f64>,
    formation_energy: Option<f64>,
    density: Option<f64>,
    youngs_modulus: Option<f64>,
    bulk_modulus: Option<f64>,
    poisson_ratio: Option<f64>,
    fracture_toughness: Option<f64>,
    tags: Option<Vec<String>>,
    props: Option<BTreeMap<String, PropValue>>,
}

/// Parse and normalize the dataset file contents.
///
/// Ids prefer the entry's own `id`, then its `local_id`, then
/// `local_<index>`; the index is the entry's position in the file, so ids
/// are stable for the life of the process. Entries without a formula are
/// skipped.
///
/// # Errors
///
/// Returns [`SearchError::Load`] if the contents are not a JSON array of
/// entries.
pub fn parse_dataset(raw: &str) -> Result<Vec<Record>, SearchError> {
    let entries: Vec<LocalEntry> =
        serde_json::from_str(raw).map_err(|e| SearchError::Load(format!("invalid dataset: {e}")))?;

    let mut records = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        match normalize(index, entry) {
            Some(record) => records.push(record),
            None => tracing::warn!(index, "skipping local entry without a formula"),
        }
    }
    Ok(records)
}

fn normalize(index: usize, entry: LocalEntry) -> Option<Record> {
    let fallback = format!("local_{index}");
    let own_id = non_empty(entry.id);
    let local_id = non_empty(entry.local_id);

    let id = own_id
        .clone()
        .or_else(|| local_id.clone())
        .unwrap_or_else(|| fallback.clone());
    let mut record = Record::new(id, Source::Local, entry.formula.unwrap_or_default())?;

    record.local_id = Some(local_id.or(own_id).unwrap_or(fallback));
    record.remote_id = non_empty(entry.remote_id);
    record.name = entry.name;
    record.spacegroup = entry.spacegroup;
    record.band_gap = finite(entry.band_gap);
    record.formation_energy = finite(entry.formation_energy);
    record.density = finite(entry.density);
    record.youngs_modulus = finite(entry.youngs_modulus);
    record.bulk_modulus = finite(entry.bulk_modulus);
    record.poisson_ratio = finite(entry.poisson_ratio);
    record.fracture_toughness = finite(entry.fracture_toughness);
    record.tags = entry.tags.unwrap_or_default();
    record.props = entry.props.unwrap_or_default();
    Some(record)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
