//! Limit/offset pagination utilities for list endpoints.

use serde::{Deserialize, Serialize};

/// Default page size when the client does not specify one.
pub const DEFAULT_LIMIT: i64 = 50;

/// Hard ceiling on page size.
pub const MAX_LIMIT: i64 = 200;

/// Pagination query parameters accepted by list endpoints.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PageQuery {
    /// Effective limit, clamped to `1..=MAX_LIMIT`.
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    /// Effective offset, never negative.
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            limit: None,
            offset: None,
        }
    }
}

/// Pagination metadata returned alongside list results.
#[derive(Debug, Clone, Serialize)]
pub struct PageInfo {
    pub limit: i64,
    pub offset: i64,
    pub total: i64,
}

/// A page of results with its pagination envelope.
#[derive(Debug, Clone, Serialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub pagination: PageInfo,
}

impl<T> Paged<T> {
    /// Builds a page from items, the query that produced it and a total count.
    pub fn new(items: Vec<T>, query: &PageQuery, total: i64) -> Self {
        Self {
            items,
            pagination: PageInfo {
                limit: query.limit(),
                offset: query.offset(),
                total,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limit_and_offset() {
        let query = PageQuery::default();
        assert_eq!(query.limit(), DEFAULT_LIMIT);
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn test_limit_is_clamped() {
        let query = PageQuery {
            limit: Some(10_000),
            offset: None,
        };
        assert_eq!(query.limit(), MAX_LIMIT);

        let query = PageQuery {
            limit: Some(0),
            offset: None,
        };
        assert_eq!(query.limit(), 1);

        let query = PageQuery {
            limit: Some(-5),
            offset: None,
        };
        assert_eq!(query.limit(), 1);
    }

    #[test]
    fn test_negative_offset_is_zeroed() {
        let query = PageQuery {
            limit: None,
            offset: Some(-10),
        };
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn test_paged_envelope() {
        let query = PageQuery {
            limit: Some(2),
            offset: Some(4),
        };
        let page = Paged::new(vec!["a", "b"], &query, 10);

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.pagination.limit, 2);
        assert_eq!(page.pagination.offset, 4);
        assert_eq!(page.pagination.total, 10);
    }

    #[test]
    fn test_page_info_serializes() {
        let query = PageQuery::default();
        let page = Paged::new(vec![1, 2, 3], &query, 3);
        let json = serde_json::to_value(&page).unwrap();

        assert_eq!(json["items"].as_array().unwrap().len(), 3);
        assert_eq!(json["pagination"]["total"], 3);
    }
}
