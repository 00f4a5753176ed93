use serde::{Deserialize, Serialize};

/// Which slice of the timeline a listing covers, relative to the current calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YearScope {
    Recent,
    Previous,
}

impl YearScope {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "recent" => Some(YearScope::Recent),
            "previous" => Some(YearScope::Previous),
            _ => None,
        }
    }
}

/// Public readers only ever see active rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    ActiveOnly,
    All,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkFilter {
    pub category_id: Option<i64>,
    pub search: Option<String>,
    pub year: Option<YearScope>,
    pub visibility: Visibility,
}

impl WorkFilter {
    pub fn public() -> Self {
        Self::default()
    }

    pub fn admin() -> Self {
        Self {
            visibility: Visibility::All,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64) -> Self {
        Self { page, limit }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FilterOrderInfo {
    pub column: String,
    pub sort: SortDirection,
}

impl FilterOrderInfo {
    pub fn desc(column: &str) -> Self {
        Self {
            column: column.to_string(),
            sort: SortDirection::Desc,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<serde_json::Value>,
}
