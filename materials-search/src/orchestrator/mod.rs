//! Search orchestrator: concurrent provider fan-out, dedup, scoring, paging.
//!
//! This module queries the local and remote providers concurrently,
//! contains their failures, deduplicates the merged records by identity
//! key, ranks them by relevance score, and slices the requested page.

pub mod dedup;
pub mod paginate;
pub mod scoring;
pub mod search;

pub use search::Aggregator;
