//! Remote provider over the materials property service.
//!
//! Sends the text term and the band-gap/density ranges as summary
//! criteria, then maps the service's heterogeneous document shapes onto
//! [`Record`]. The remote filter is treated as an optimization only: every
//! range filter is re-applied to the normalized records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::RemoteConfig;
use crate::error::SearchError;
use crate::http::{build_client, API_KEY_HEADER};
use crate::provider::MaterialsProvider;
use crate::query::SearchQuery;
use crate::types::{finite, PropValue, Record, Source};

/// Fields requested from the summary endpoint.
pub const SUMMARY_PROPERTIES: &[&str] = &[
    "material_id",
    "formula_pretty",
    "band_gap",
    "density",
    "symmetry.symbol",
    "elasticity.K_VRH",
    "elasticity.G_VRH",
    "elasticity.E_Young",
    "elasticity.poisson_ratio",
    "formation_energy_per_atom",
];

/// Provider that queries the remote summary endpoint.
pub struct RemoteProvider {
    config: RemoteConfig,
    client: reqwest::Client,
}

impl RemoteProvider {
    /// Create a provider for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the HTTP client cannot be built.
    pub fn new(config: RemoteConfig) -> Result<Self, SearchError> {
        let client = build_client(&config)?;
        Ok(Self { config, client })
    }

    /// Whether a credential is configured. Without one every query is empty.
    pub fn is_available(&self) -> bool {
        self.config.has_credential()
    }
}

impl MaterialsProvider for RemoteProvider {
    async fn query(&self, query: &SearchQuery) -> Result<Vec<Record>, SearchError> {
        let Some(key) = self.config.api_key.as_deref().filter(|_| self.is_available()) else {
            tracing::debug!("remote provider has no credential; skipping");
            return Ok(Vec::new());
        };

        let endpoint = self.config.endpoint();
        tracing::trace!(%endpoint, "querying remote summary endpoint");

        let response = self
            .client
            .post(&endpoint)
            .header(API_KEY_HEADER, key)
            .json(&build_request(query))
            .send()
            .await
            .map_err(|e| SearchError::Http(format!("request to remote failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let raw = response
            .text()
            .await
            .map_err(|e| SearchError::Http(format!("failed to read remote body: {e}")))?;
        let records = normalize_documents(parse_documents(&raw)?);
        let fetched = records.len();

        let kept: Vec<Record> = records
            .into_iter()
            .filter(|r| query.admits_ranges(r))
            .collect();
        tracing::debug!(fetched, kept = kept.len(), "remote documents normalized");
        Ok(kept)
    }

    fn source(&self) -> Source {
        Source::Remote
    }
}

/// JSON body for the summary endpoint.
#[derive(Debug, Serialize)]
pub struct SummaryRequest<'a> {
    pub criteria: Criteria<'a>,
    pub properties: &'static [&'static str],
}

/// Filters the remote side applies natively. Toughness is not among them.
#[derive(Debug, Default, Serialize)]
pub struct Criteria<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formula: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band_gap_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band_gap_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub density_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub density_max: Option<f64>,
}

/// Translate `query` into the summary request shape.
pub fn build_request(query: &SearchQuery) -> SummaryRequest<'_> {
    SummaryRequest {
        criteria: Criteria {
            formula: query.text.as_deref().map(str::trim).filter(|t| !t.is_empty()),
            band_gap_min: query.band_gap.min,
            band_gap_max: query.band_gap.max,
            density_min: query.density.min,
            density_max: query.density.max,
        },
        properties: SUMMARY_PROPERTIES,
    }
}

/// Extract the document list from a response body.
///
/// Accepts `{"data": [...]}` or a bare array; any other well-formed JSON
/// yields no documents.
///
/// # Errors
///
/// Returns [`SearchError::Parse`] if the body is not JSON.
pub fn parse_documents(raw: &str) -> Result<Vec<Value>, SearchError> {
    let json: Value = serde_json::from_str(raw)
        .map_err(|e| SearchError::Parse(format!("remote body is not JSON: {e}")))?;
    Ok(match json {
        Value::Array(docs) => docs,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(docs)) => docs,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct SummaryDoc {
    material_id: Option<String>,
    formula_pretty: Option<String>,
    formula: Option<String>,
    band_gap: Option<f64>,
    density: Option<f64>,
    formation_energy_per_atom: Option<f64>,
    symmetry: Option<Symbol>,
    spacegroup: Option<Symbol>,
    elasticity: Option<Elasticity>,
}

/// Space group info arrives either as `{"symbol": ..}` or a bare string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Symbol {
    Nested { symbol: Option<String> },
    Plain(String),
}

impl Symbol {
    fn into_symbol(self) -> Option<String> {
        match self {
            Self::Nested { symbol } => symbol,
            Self::Plain(s) => Some(s),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct Elasticity {
    #[serde(rename = "E_Young")]
    e_young: Option<f64>,
    #[serde(rename = "K_VRH")]
    k_vrh: Option<f64>,
    #[serde(rename = "G_VRH")]
    g_vrh: Option<f64>,
    poisson_ratio: Option<f64>,
}

/// Map raw documents onto records, skipping ones that cannot be decoded or
/// carry no formula.
pub fn normalize_documents(docs: Vec<Value>) -> Vec<Record> {
    docs.into_iter()
        .enumerate()
        .filter_map(|(index, raw)| match serde_json::from_value::<SummaryDoc>(raw) {
            Ok(doc) => {
                let record = normalize(index, doc);
                if record.is_none() {
                    tracing::warn!(index, "skipping remote document without a formula");
                }
                record
            }
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping undecodable remote document");
                None
            }
        })
        .collect()
}

fn normalize(index: usize, doc: SummaryDoc) -> Option<Record> {
    let remote_id = doc.material_id.filter(|id| !id.trim().is_empty());
    let id = remote_id
        .clone()
        .unwrap_or_else(|| format!("remote_{index}"));
    let formula = doc.formula_pretty.or(doc.formula).unwrap_or_default();
    let mut record = Record::new(id, Source::Remote, formula)?;

    let elasticity = doc.elasticity.unwrap_or_default();
    record.remote_id = remote_id;
    record.spacegroup = doc
        .symmetry
        .and_then(Symbol::into_symbol)
        .or_else(|| doc.spacegroup.and_then(Symbol::into_symbol));
    record.band_gap = finite(doc.band_gap);
    record.density = finite(doc.density);
    record.formation_energy = finite(doc.formation_energy_per_atom);
    record.youngs_modulus = finite(elasticity.e_young);
    record.bulk_modulus = finite(elasticity.k_vrh);
    record.poisson_ratio = finite(elasticity.poisson_ratio);
    record.props.insert("K_VRH".into(), PropValue::from(elasticity.k_vrh));
    record.props.insert("G_VRH".into(), PropValue::from(elasticity.g_vrh));
    Some(record)
}
