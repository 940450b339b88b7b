//! Lexical and source relevance scoring.
//!
//! Formula:
//!
//! ```text
//! score = 10  if the query text occurs in formula/name/tags (case-insensitive)
//!       + 30  if the formula equals the query text (case-insensitive)
//!       +  2  if the record came from the remote service
//! ```
//!
//! Scores depend on the query, are recomputed on every call and are never
//! stored on the record.

use std::cmp::Reverse;

use crate::types::{Record, Source};

/// Awarded when the query text occurs anywhere in the record's haystack.
pub const TEXT_MATCH_SCORE: u32 = 10;
/// Awarded on top of [`TEXT_MATCH_SCORE`] for an exact formula match.
pub const EXACT_FORMULA_SCORE: u32 = 30;
/// Awarded to records from [`Source::Remote`].
pub const REMOTE_SOURCE_SCORE: u32 = 2;

/// Score `record` against `needle` (the lower-cased query text, if any).
pub fn calculate_score(record: &Record, needle: Option<&str>) -> u32 {
    let mut score = 0;
    if let Some(needle) = needle {
        if record.matches_text(needle) {
            score += TEXT_MATCH_SCORE;
        }
        if record.formula.to_lowercase() == needle {
            score += EXACT_FORMULA_SCORE;
        }
    }
    if record.source == Source::Remote {
        score += REMOTE_SOURCE_SCORE;
    }
    score
}

/// Order records by descending score.
///
/// The sort is stable: equal scores keep their incoming (merge) order.
pub fn rank(records: Vec<Record>, needle: Option<&str>) -> Vec<Record> {
    let mut scored: Vec<(u32, Record)> = records
        .into_iter()
        .map(|record| (calculate_score(&record, needle), record))
        .collect();
    scored.sort_by_key(|(score, _)| Reverse(*score));
    scored.into_iter().map(|(_, record)| record).collect()
}
