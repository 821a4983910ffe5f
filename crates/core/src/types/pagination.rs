//! Page/limit pagination over an already-filtered list.

use serde::Deserialize;

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PageRequest {
    /// Page number, starting at 1.
    pub page: u32,
    /// Maximum number of items per page.
    pub limit: u32,
}

impl PageRequest {
    /// Build a page request from optional query parameters.
    ///
    /// Pagination only applies when both values are present. Pages below 1
    /// are clamped to the first page.
    #[must_use]
    pub fn from_query(page: Option<u32>, limit: Option<u32>) -> Option<Self> {
        match (page, limit) {
            (Some(page), Some(limit)) => Some(Self {
                page: page.max(1),
                limit,
            }),
            _ => None,
        }
    }

    /// Index of the first item on this page.
    #[must_use]
    pub fn offset(&self) -> usize {
        let page = usize::try_from(self.page.max(1)).unwrap_or(usize::MAX);
        (page - 1).saturating_mul(self.limit_usize())
    }

    fn limit_usize(&self) -> usize {
        usize::try_from(self.limit).unwrap_or(usize::MAX)
    }
}

/// Apply an optional page request to a list.
///
/// A page starting beyond the end of the list is empty.
#[must_use]
pub fn paginate<T>(items: Vec<T>, request: Option<PageRequest>) -> Vec<T> {
    let Some(request) = request else {
        return items;
    };

    items
        .into_iter()
        .skip(request.offset())
        .take(request.limit_usize())
        .collect()
}
