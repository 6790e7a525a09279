//! Typed building blocks for explorer query parameters

use std::fmt;

use chrono::NaiveDate;

use super::QueryParams;
use crate::config::constants::DEFAULT_END_BLOCK;

/// Result ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Sort {
    /// Oldest first
    #[default]
    Asc,
    /// Newest first
    Desc,
}

impl Sort {
    /// Wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            Sort::Asc => "asc",
            Sort::Desc => "desc",
        }
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive block range
///
/// Defaults to the widest range the explorer accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRange {
    /// First block
    pub start: u64,
    /// Last block
    pub end: u64,
}

impl BlockRange {
    /// Range `start..=end`
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// From `start` to the default upper bound
    pub fn from_block(start: u64) -> Self {
        Self {
            start,
            end: DEFAULT_END_BLOCK,
        }
    }
}

impl Default for BlockRange {
    fn default() -> Self {
        Self::from_block(0)
    }
}

/// Page number and page size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number
    pub page: u32,
    /// Records per page
    pub offset: u32,
}

impl Page {
    /// Page `page` of `offset` records
    pub fn new(page: u32, offset: u32) -> Self {
        Self { page, offset }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self { page: 1, offset: 10 }
    }
}

/// Inclusive date range for the daily statistics endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// First day
    pub start: NaiveDate,
    /// Last day
    pub end: NaiveDate,
    /// Ordering, ascending by default
    pub sort: Sort,
}

impl DateRange {
    /// Ascending range `start..=end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            sort: Sort::Asc,
        }
    }

    /// Same range, different ordering
    #[must_use]
    pub fn sorted(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    pub(crate) fn apply(&self, params: QueryParams) -> QueryParams {
        params
            .with("startdate", self.start.format("%Y-%m-%d").to_string())
            .with("enddate", self.end.format("%Y-%m-%d").to_string())
            .with("sort", self.sort.as_str())
    }
}

/// Which block to pick for a timestamp between two blocks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Closest {
    /// The last block at or before the timestamp
    #[default]
    Before,
    /// The first block after the timestamp
    After,
}

impl Closest {
    /// Wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            Closest::Before => "before",
            Closest::After => "after",
        }
    }
}

/// Options shared by the account list endpoints
///
/// The default covers every block, sorted ascending, with the explorer's
/// default paging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Block range
    pub range: BlockRange,
    /// Explicit paging; `None` lets the explorer decide
    pub page: Option<Page>,
    /// Ordering
    pub sort: Sort,
}

impl ListOptions {
    /// Restricts the block range.
    #[must_use]
    pub fn range(mut self, range: BlockRange) -> Self {
        self.range = range;
        self
    }

    /// Requests a specific page.
    #[must_use]
    pub fn page(mut self, page: Page) -> Self {
        self.page = Some(page);
        self
    }

    /// Sets the ordering.
    #[must_use]
    pub fn sort(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    pub(crate) fn apply(&self, params: QueryParams) -> QueryParams {
        params
            .with("startblock", self.range.start)
            .with("endblock", self.range.end)
            .with("sort", self.sort.as_str())
            .with_opt("page", self.page.map(|p| p.page))
            .with_opt("offset", self.page.map(|p| p.offset))
    }
}
