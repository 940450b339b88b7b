//! Deterministic page slicing.

use crate::types::{Record, SearchResult};

/// Largest page size a caller can request.
pub const MAX_PAGE_SIZE: i64 = 100;

/// A normalized page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// 1-based page number, at least 1.
    pub page: usize,
    /// Page size in `[1, MAX_PAGE_SIZE]`.
    pub page_size: usize,
}

impl PageWindow {
    /// Clamp a raw request: `page < 1` reads as 1, `page_size` is clamped
    /// to `[1, MAX_PAGE_SIZE]`.
    pub fn new(page: i64, page_size: i64) -> Self {
        let page = usize::try_from(page.max(1)).unwrap_or(usize::MAX);
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE) as usize;
        Self { page, page_size }
    }

    /// Index of the first item on this page. Saturates instead of overflowing.
    pub fn start(&self) -> usize {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

/// Slice `records` into the requested page.
///
/// `total` is always the full count; a page past the end has no items.
pub fn paginate(records: Vec<Record>, window: PageWindow) -> SearchResult {
    let total = records.len();
    let items = records
        .into_iter()
        .skip(window.start())
        .take(window.page_size)
        .collect();
    SearchResult { total, items }
}
