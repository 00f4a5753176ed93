/// Shared types used across the codebase

use serde::Serialize;

/// One page of a listing, as returned in the `data` field of list endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T: Serialize> {
    pub items: Vec<T>,
    pub total_count: i64,
    pub current_page: i64,
    pub total_pages: i64,
    pub has_more: bool,
}

impl<T: Serialize> Paginated<T> {
    /// `page` is 1-based and `limit` is always positive by the time it gets here.
    pub fn new(items: Vec<T>, total_count: i64, page: i64, limit: i64) -> Self {
        let limit = limit.max(1);
        Self {
            items,
            total_count,
            current_page: page,
            total_pages: (total_count + limit - 1) / limit,
            has_more: page.saturating_mul(limit) < total_count,
        }
    }
}
