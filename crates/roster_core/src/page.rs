//! Page requests, pages, and the count-query decision.
//!
//! # Responsibility
//! - Validate `(offset, limit)` input before any query runs.
//! - Decide whether a count query is needed once the content query returned.
//!
//! # Invariants
//! - `0 <= results.len() <= limit` and `offset >= 0` for every `Page`.
//! - The count query is skipped only when `offset == 0` and the content query
//!   returned fewer than `limit` rows. A short page at a non-zero offset is
//!   still counted.

use crate::repo::error::{RepoError, RepoResult};
use serde::{Deserialize, Serialize};

/// Validated `(offset, limit)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    offset: u64,
    limit: u64,
}

impl PageRequest {
    /// Creates a request from a raw row offset and page size.
    ///
    /// # Errors
    /// - `InvalidArgument` when `offset < 0` or `limit <= 0`.
    pub fn new(offset: i64, limit: i64) -> RepoResult<Self> {
        if offset < 0 {
            return Err(RepoError::InvalidArgument(format!(
                "page offset must be non-negative, got {offset}"
            )));
        }
        if limit <= 0 {
            return Err(RepoError::InvalidArgument(format!(
                "page limit must be positive, got {limit}"
            )));
        }
        Ok(Self {
            offset: offset.unsigned_abs(),
            limit: limit.unsigned_abs(),
        })
    }

    /// Creates a request from a zero-based page number and page size.
    ///
    /// # Errors
    /// - `InvalidArgument` when `page < 0`, `size <= 0`, or the offset overflows.
    pub fn of(page: i64, size: i64) -> RepoResult<Self> {
        if page < 0 {
            return Err(RepoError::InvalidArgument(format!(
                "page number must be non-negative, got {page}"
            )));
        }
        let offset = page.checked_mul(size).ok_or_else(|| {
            RepoError::InvalidArgument(format!("page {page} with size {size} overflows offset"))
        })?;
        Self::new(offset, size)
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }
}

/// Whether a page total must come from a count query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountDecision {
    /// The content query already returned every matching row.
    Skip { total: u64 },
    /// The page may be full or is not the first page; run the count query.
    Issue,
}

/// Decides the count strategy from the content query outcome alone.
pub fn decide_count(request: &PageRequest, fetched: usize) -> CountDecision {
    let fetched = fetched as u64;
    if request.offset == 0 && fetched < request.limit {
        CountDecision::Skip { total: fetched }
    } else {
        CountDecision::Issue
    }
}

/// Ordered slice of results plus the total number of matching rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub results: Vec<T>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

impl<T> Page<T> {
    /// Builds a page whose total was computed independently of the content.
    ///
    /// # Errors
    /// - `InvalidData` when the content holds more rows than the request limit.
    pub fn from_counted(results: Vec<T>, request: &PageRequest, total: u64) -> RepoResult<Self> {
        if results.len() as u64 > request.limit {
            return Err(RepoError::InvalidData(format!(
                "content query returned {} rows for limit {}",
                results.len(),
                request.limit
            )));
        }
        Ok(Self {
            results,
            total,
            limit: request.limit,
            offset: request.offset,
        })
    }

    /// Builds a page, running `count` only when [`decide_count`] says so.
    ///
    /// Returns the page together with the decision that fired.
    pub fn from_content<F>(
        results: Vec<T>,
        request: &PageRequest,
        count: F,
    ) -> RepoResult<(Self, CountDecision)>
    where
        F: FnOnce() -> RepoResult<u64>,
    {
        let decision = decide_count(request, results.len());
        let total = match decision {
            CountDecision::Skip { total } => total,
            CountDecision::Issue => count()?,
        };
        Ok((Self::from_counted(results, request, total)?, decision))
    }

    pub fn total_pages(&self) -> u64 {
        if self.limit == 0 {
            return 0;
        }
        self.total.div_ceil(self.limit)
    }

    /// Zero-based page number this slice starts on.
    pub fn page_number(&self) -> u64 {
        self.offset.checked_div(self.limit).unwrap_or(0)
    }

    pub fn is_first(&self) -> bool {
        self.offset == 0
    }

    pub fn has_next(&self) -> bool {
        self.offset + (self.results.len() as u64) < self.total
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            results: self.results.into_iter().map(f).collect(),
            total: self.total,
            limit: self.limit,
            offset: self.offset,
        }
    }
}
