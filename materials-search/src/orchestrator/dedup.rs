//! Cross-source deduplication by identity key.
//!
//! The key prefers the remote identifier, so a local entry that carries a
//! cross-reference to the remote service collapses with the remote copy.
//! Otherwise the key is synthesized from source, formula and space group.
//! The first record seen per key wins; later duplicates are dropped whole.

use std::collections::HashSet;

use crate::types::Record;

/// Compute the identity key for `record`.
pub fn dedup_key(record: &Record) -> String {
    match record.remote_id.as_deref() {
        Some(remote_id) => remote_id.to_owned(),
        None => format!(
            "{}:{}:{}",
            record.source,
            record.formula,
            record.spacegroup.as_deref().unwrap_or("")
        ),
    }
}

/// Drop every record whose key was already seen, preserving input order.
pub fn deduplicate(records: Vec<Record>) -> Vec<Record> {
    let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
    let before = records.len();

    let kept: Vec<Record> = records
        .into_iter()
        .filter(|record| seen.insert(dedup_key(record)))
        .collect();

    if kept.len() < before {
        tracing::debug!(dropped = before - kept.len(), "duplicate records dropped");
    }
    kept
}
