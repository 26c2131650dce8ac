//! Pagination types
//!
//! Listings are windowed by `page`/`limit`. The window is computed from the
//! total record count so the requested page can be clamped to the last one.

use serde::{Deserialize, Serialize};

/// Smallest accepted page size
pub const MIN_LIMIT: i64 = 5;

/// Largest accepted page size
pub const MAX_LIMIT: i64 = 100;

/// Page size when `limit` is not given
pub const DEFAULT_LIMIT: i64 = 10;

/// Rejected pagination query values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    #[error("page parameter should be number and greater than 1")]
    Page,

    #[error("limit parameter should be number and between 5 and 100")]
    Limit,
}

/// Requested page (1-indexed) and page size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    /// Create pagination, rejecting out-of-range values.
    ///
    /// - `page` must be at least 1
    /// - `limit` must be within 5..=100
    pub fn new(page: i64, limit: i64) -> Result<Self, PaginationError> {
        if page < 1 {
            return Err(PaginationError::Page);
        }
        if !(MIN_LIMIT..=MAX_LIMIT).contains(&limit) {
            return Err(PaginationError::Limit);
        }
        Ok(Self { page, limit })
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Raw query parameters for pagination.
///
/// Kept as strings so non-numeric values are reported as validation
/// failures rather than extractor rejections.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl TryFrom<PaginationParams> for Pagination {
    type Error = PaginationError;

    fn try_from(params: PaginationParams) -> Result<Self, Self::Error> {
        let page = match params.page.as_deref() {
            None => 1,
            Some(raw) => raw.trim().parse().map_err(|_| PaginationError::Page)?,
        };
        let limit = match params.limit.as_deref() {
            None => DEFAULT_LIMIT,
            Some(raw) => raw.trim().parse().map_err(|_| PaginationError::Limit)?,
        };
        Self::new(page, limit)
    }
}

/// Page window resolved against the total number of records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub limit: i64,
    pub record_total: i64,
    pub page_total: i64,
    pub prev: Option<i64>,
    pub next: Option<i64>,
}

impl PageWindow {
    /// Resolve a requested page against `record_total` rows.
    ///
    /// The page is clamped to the last page, but never below 1, so an empty
    /// listing reports page 1 of 0.
    pub fn new(requested: Pagination, record_total: i64) -> Self {
        let limit = requested.limit;
        let record_total = record_total.max(0);
        let page_total = if record_total % limit > 0 {
            record_total / limit + 1
        } else {
            record_total / limit
        };
        let page = requested.page.min(page_total).max(1);

        Self {
            page,
            limit,
            record_total,
            page_total,
            prev: (page > 1).then(|| page - 1),
            next: (page < page_total).then(|| page + 1),
        }
    }

    /// SQL OFFSET for this window.
    pub fn offset(&self) -> i64 {
        self.limit * (self.page - 1)
    }
}

/// Paginated response wrapper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub page: i64,
    pub limit: i64,
    pub next: Option<i64>,
    pub prev: Option<i64>,
    pub record_total: i64,
    pub page_total: i64,
    pub data: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn new(window: PageWindow, data: Vec<T>) -> Self {
        Self {
            page: window.page,
            limit: window.limit,
            next: window.next,
            prev: window.prev,
            record_total: window.record_total,
            page_total: window.page_total,
            data,
        }
    }
}
