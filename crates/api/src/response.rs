//! API response types.

use serde::{Deserialize, Serialize};

/// Fixed page size for every list endpoint.
pub const PAGE_SIZE: u64 = 20;

/// Page-number query parameter, 1-based.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
}

impl PageQuery {
    /// The requested page, defaulting to the first.
    #[must_use]
    pub fn page(self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }
}

/// Paginated list envelope.
#[derive(Debug, Serialize)]
pub struct Paginated<T: Serialize> {
    pub count: u64,
    pub next: Option<u64>,
    pub previous: Option<u64>,
    pub results: Vec<T>,
}

impl<T: Serialize> Paginated<T> {
    /// Wrap one page of results.
    #[must_use]
    pub fn new(results: Vec<T>, count: u64, page: u64, per_page: u64) -> Self {
        let total_pages = count.div_ceil(per_page).max(1);
        let next = (page < total_pages).then(|| page + 1);
        let previous = (page > 1 && page <= total_pages).then(|| page - 1);

        Self {
            count,
            next,
            previous,
            results,
        }
    }

    /// An empty first page.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            count: 0,
            next: None,
            previous: None,
            results: vec![],
        }
    }
}
