//! Core types for normalized materials records and aggregated results.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Which provider produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// The locally cached bulk dataset.
    Local,
    /// The remote property-lookup service.
    Remote,
}

impl Source {
    /// Returns the wire name of this source.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A scalar stored in a record's open-ended `props` bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    Number(f64),
    Text(String),
    Null,
}

impl From<Option<f64>> for PropValue {
    fn from(value: Option<f64>) -> Self {
        match finite(value) {
            Some(v) => Self::Number(v),
            None => Self::Null,
        }
    }
}

/// A normalized materials entry.
///
/// Built by a provider and never mutated afterwards. `formula` is never
/// empty; numeric properties are either a finite number or `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Process-unique identifier assigned by the owning provider.
    pub id: String,
    /// Provider that produced this record.
    pub source: Source,
    /// Chemical formula, e.g. `Al2O3`.
    pub formula: String,
    /// Common name, if known.
    pub name: Option<String>,
    /// Space group symbol, e.g. `R-3c`.
    pub spacegroup: Option<String>,
    /// Band gap in eV.
    pub band_gap: Option<f64>,
    /// Formation energy in eV/atom.
    pub formation_energy: Option<f64>,
    /// Density in g/cm^3.
    pub density: Option<f64>,
    /// Young's modulus in GPa.
    pub youngs_modulus: Option<f64>,
    /// Bulk modulus in GPa.
    pub bulk_modulus: Option<f64>,
    pub poisson_ratio: Option<f64>,
    /// Fracture toughness in MPa·m^0.5.
    pub fracture_toughness: Option<f64>,
    pub tags: Vec<String>,
    /// Extension bag for provider fields without a dedicated slot.
    pub props: BTreeMap<String, PropValue>,
    /// Identifier within the local dataset.
    pub local_id: Option<String>,
    /// Identifier within the remote service. Local entries may carry one as
    /// a cross-reference, which makes them collapse with the remote copy.
    pub remote_id: Option<String>,
}

impl Record {
    /// Create a record with every optional property absent.
    ///
    /// Returns `None` when `formula` is empty or whitespace.
    pub fn new(id: impl Into<String>, source: Source, formula: impl Into<String>) -> Option<Self> {
        let formula = formula.into();
        if formula.trim().is_empty() {
            return None;
        }
        Some(Self {
            id: id.into(),
            source,
            formula,
            name: None,
            spacegroup: None,
            band_gap: None,
            formation_energy: None,
            density: None,
            youngs_modulus: None,
            bulk_modulus: None,
            poisson_ratio: None,
            fracture_toughness: None,
            tags: Vec::new(),
            props: BTreeMap::new(),
            local_id: None,
            remote_id: None,
        })
    }

    /// Lower-cased, space-joined formula, name and tags.
    pub fn haystack(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(2 + self.tags.len());
        parts.push(&self.formula);
        parts.push(self.name.as_deref().unwrap_or(""));
        parts.extend(self.tags.iter().map(String::as_str));
        parts.join(" ").to_lowercase()
    }

    /// Whether `needle` (already lower-cased) occurs in [`Record::haystack`].
    pub fn matches_text(&self, needle: &str) -> bool {
        self.haystack().contains(needle)
    }
}

/// Drop non-finite numbers so NaN and infinities read as absent.
pub fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// One page of an aggregated search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Number of records after merge, dedup and filtering, before slicing.
    pub total: usize,
    /// The requested page.
    pub items: Vec<Record>,
}
