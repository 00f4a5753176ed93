use std::collections::HashMap;

use super::error::FilterError;
use super::types::{Pagination, WorkFilter, YearScope};

/// Raw listing query string parsed into typed filter and pagination values.
///
/// Handlers take `Query<HashMap<String, String>>` so malformed numbers surface as
/// a `FilterError` naming the offending parameter instead of a generic rejection.
#[derive(Debug, Clone)]
pub struct ListParams<'a> {
    params: &'a HashMap<String, String>,
}

impl<'a> ListParams<'a> {
    pub fn new(params: &'a HashMap<String, String>) -> Self {
        Self { params }
    }

    fn get(&self, key: &str) -> Option<&'a str> {
        self.params
            .get(key)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    /// `page` defaults to 1, `limit` to `default_limit`; a limit above `max_limit` is capped.
    /// A page whose end row does not fit in an `i64` is rejected.
    pub fn pagination(&self, default_limit: i64, max_limit: i64) -> Result<Pagination, FilterError> {
        let page = match self.get("page") {
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|_| FilterError::InvalidPage(format!("'{}' is not a number", raw)))?,
            None => 1,
        };
        if page < 1 {
            return Err(FilterError::InvalidPage("page must be at least 1".to_string()));
        }

        let limit = self.limit(default_limit, max_limit)?;
        if page.checked_mul(limit).is_none() {
            return Err(FilterError::InvalidPage(format!("page {} is out of range", page)));
        }

        Ok(Pagination::new(page, limit))
    }

    /// `limit` alone, for listings without pages.
    pub fn limit(&self, default_limit: i64, max_limit: i64) -> Result<i64, FilterError> {
        let limit = match self.get("limit") {
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|_| FilterError::InvalidLimit(format!("'{}' is not a number", raw)))?,
            None => default_limit,
        };
        if limit < 1 {
            return Err(FilterError::InvalidLimit("limit must be at least 1".to_string()));
        }

        if limit > max_limit {
            tracing::debug!("Limit {} exceeds max {}, capping to max", limit, max_limit);
            return Ok(max_limit);
        }
        Ok(limit)
    }

    /// `categoryId=all` and an absent value both mean no category filter.
    pub fn category_id(&self) -> Result<Option<i64>, FilterError> {
        match self.get("categoryId") {
            None | Some("all") => Ok(None),
            Some(raw) => raw
                .parse::<i64>()
                .map(Some)
                .map_err(|_| FilterError::InvalidCategory(format!("'{}' is not a number", raw))),
        }
    }

    pub fn year(&self) -> Result<Option<YearScope>, FilterError> {
        match self.get("year") {
            None => Ok(None),
            Some(raw) => YearScope::parse(raw)
                .map(Some)
                .ok_or_else(|| FilterError::InvalidYear(format!("expected 'recent' or 'previous', got '{}'", raw))),
        }
    }

    pub fn search(&self) -> Option<String> {
        self.get("search").map(str::to_string)
    }

    /// Filter for the public listing: category and year, active rows only.
    pub fn public_filter(&self) -> Result<WorkFilter, FilterError> {
        Ok(WorkFilter {
            category_id: self.category_id()?,
            year: self.year()?,
            ..WorkFilter::public()
        })
    }

    /// Filter for the admin listing: category and search over every row.
    pub fn admin_filter(&self) -> Result<WorkFilter, FilterError> {
        Ok(WorkFilter {
            category_id: self.category_id()?,
            search: self.search(),
            ..WorkFilter::admin()
        })
    }
}
