//! Opaque page keys and the response shape a paginated loader produces.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default page size used by `From<u32> for NumberedPage`, matching the
/// teacher's default page size for its own pagination hooks.
pub const DEFAULT_NUMBERED_PAGE_SIZE: u32 = 25;

/// A page addressed by a 1-based page number plus a fixed page size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberedPage {
    pub number: u32,
    pub size: u32,
}

impl NumberedPage {
    pub fn new(number: u32, size: u32) -> Self {
        Self { number, size }
    }

    /// The page that follows this one.
    pub fn next(&self) -> Self {
        Self { number: self.number + 1, size: self.size }
    }
}

/// Builds the first page of the default size from a bare page number.
impl From<u32> for NumberedPage {
    fn from(number: u32) -> Self {
        Self { number, size: DEFAULT_NUMBERED_PAGE_SIZE }
    }
}

/// A page addressed by a byte/row offset plus a limit, as used by SQL-style
/// `LIMIT`/`OFFSET` backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetPage {
    pub limit: u32,
    pub offset: u32,
}

impl OffsetPage {
    pub fn new(offset: u32, limit: u32) -> Self {
        Self { limit, offset }
    }

    pub fn next(&self) -> Self {
        Self { limit: self.limit, offset: self.offset + self.limit }
    }
}

/// A page addressed by an exclusive end timestamp plus a page size, as used
/// by feeds paginated backwards in time ("load older items before t").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampedPage {
    pub end_date: DateTime<Utc>,
    pub size: u32,
}

impl TimestampedPage {
    pub fn new(end_date: DateTime<Utc>, size: u32) -> Self {
        Self { end_date, size }
    }
}

/// What a single call to a page-keyed loader produces: the items on the
/// page plus the key of the page that follows, if any.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PageSlice<V, P> {
    pub values: Vec<V>,
    pub page: P,
    pub next_page: Option<P>,
}

impl<V, P> PageSlice<V, P> {
    pub fn new(values: Vec<V>, page: P, next_page: Option<P>) -> Self {
        Self { values, page, next_page }
    }

    /// A page with no further page after it.
    pub fn last(values: Vec<V>, page: P) -> Self {
        Self { values, page, next_page: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_page_from_u32_uses_default_size() {
        let p: NumberedPage = 3.into();
        assert_eq!(p, NumberedPage { number: 3, size: DEFAULT_NUMBERED_PAGE_SIZE });
    }

    #[test]
    fn numbered_page_next_increments_number_and_keeps_size() {
        let p = NumberedPage::new(1, 10);
        assert_eq!(p.next(), NumberedPage::new(2, 10));
    }

    #[test]
    fn offset_page_next_advances_by_limit() {
        let p = OffsetPage::new(0, 20);
        assert_eq!(p.next(), OffsetPage::new(20, 20));
    }
}
