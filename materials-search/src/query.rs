//! Query model: dataset scope, inclusive range filters, and parsing of the
//! primitive wire parameters into a validated [`SearchQuery`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SearchError};
use crate::types::{Record, Source};

/// Default page size when the caller does not supply one.
pub const DEFAULT_PAGE_SIZE: i64 = 24;

/// Which providers a query should consult.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetScope {
    #[default]
    All,
    Local,
    Remote,
}

impl DatasetScope {
    /// Whether `source` is consulted under this scope.
    pub fn includes(self, source: Source) -> bool {
        match self {
            Self::All => true,
            Self::Local => source == Source::Local,
            Self::Remote => source == Source::Remote,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Local => "local",
            Self::Remote => "remote",
        }
    }
}

impl fmt::Display for DatasetScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatasetScope {
    type Err = SearchError;

    /// Unknown values are rejected rather than widened to `all`.
    fn from_str(raw: &str) -> Result<Self> {
        match raw {
            "all" => Ok(Self::All),
            "local" => Ok(Self::Local),
            "remote" => Ok(Self::Remote),
            other => Err(SearchError::InvalidInput(format!(
                "dataset must be one of all, local, remote; got {other:?}"
            ))),
        }
    }
}

/// An inclusive `[min, max]` constraint on a nullable numeric field.
///
/// A record whose field is absent fails any active filter: absence is not a
/// wildcard. With neither bound set the filter admits everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeFilter {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl RangeFilter {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    /// Whether either bound is set.
    pub fn is_active(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    /// Whether `value` passes this filter.
    pub fn admits(&self, value: Option<f64>) -> bool {
        if !self.is_active() {
            return true;
        }
        let Some(v) = value else {
            return false;
        };
        if self.min.is_some_and(|lo| v < lo) {
            return false;
        }
        if self.max.is_some_and(|hi| v > hi) {
            return false;
        }
        true
    }
}

/// Validated caller intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free text matched against formula, name and tags.
    pub text: Option<String>,
    pub dataset: DatasetScope,
    /// 1-based page number. Values below 1 read as 1 at pagination time.
    pub page: i64,
    /// Requested page size, clamped to `[1, 100]` at pagination time.
    pub page_size: i64,
    pub band_gap: RangeFilter,
    pub fracture_toughness: RangeFilter,
    pub density: RangeFilter,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            text: None,
            dataset: DatasetScope::All,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            band_gap: RangeFilter::default(),
            fracture_toughness: RangeFilter::default(),
            density: RangeFilter::default(),
        }
    }
}

impl SearchQuery {
    /// Lower-cased query text, or `None` when there is no text term.
    pub fn needle(&self) -> Option<String> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
    }

    /// Whether `record` passes the band-gap, toughness and density filters.
    pub fn admits_ranges(&self, record: &Record) -> bool {
        self.band_gap.admits(record.band_gap)
            && self.fracture_toughness.admits(record.fracture_toughness)
            && self.density.admits(record.density)
    }

    /// Build a query from primitive wire parameters.
    ///
    /// Blank values count as "not provided".
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidInput`] for a non-numeric bound, a
    /// non-integer page or page size, or an unknown dataset.
    pub fn from_params(params: &SearchParams) -> Result<Self> {
        let dataset = match present(&params.dataset) {
            Some(raw) => raw.parse()?,
            None => DatasetScope::All,
        };

        Ok(Self {
            text: present(&params.q).map(str::to_owned),
            dataset,
            page: parse_int("page", &params.page)?.unwrap_or(1),
            page_size: parse_int("pageSize", &params.page_size)?.unwrap_or(DEFAULT_PAGE_SIZE),
            band_gap: RangeFilter::new(
                parse_bound("bandGapMin", &params.band_gap_min)?,
                parse_bound("bandGapMax", &params.band_gap_max)?,
            ),
            fracture_toughness: RangeFilter::new(
                parse_bound("toughMin", &params.tough_min)?,
                parse_bound("toughMax", &params.tough_max)?,
            ),
            density: RangeFilter::new(
                parse_bound("densMin", &params.dens_min)?,
                parse_bound("densMax", &params.dens_max)?,
            ),
        })
    }
}

/// Primitive query fields as they arrive from a form or query string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchParams {
    pub q: Option<String>,
    pub dataset: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub band_gap_min: Option<String>,
    pub band_gap_max: Option<String>,
    pub tough_min: Option<String>,
    pub tough_max: Option<String>,
    pub dens_min: Option<String>,
    pub dens_max: Option<String>,
}

fn present(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_bound(field: &str, raw: &Option<String>) -> Result<Option<f64>> {
    let Some(s) = present(raw) else {
        return Ok(None);
    };
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(SearchError::InvalidInput(format!(
            "{field} is not a finite number: {s:?}"
        ))),
    }
}

fn parse_int(field: &str, raw: &Option<String>) -> Result<Option<i64>> {
    let Some(s) = present(raw) else {
        return Ok(None);
    };
    s.parse::<i64>()
        .map(Some)
        .map_err(|_| SearchError::InvalidInput(format!("{field} is not an integer: {s:?}")))
}
