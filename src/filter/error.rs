use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FilterError {
    #[error("Invalid page: {0}")]
    InvalidPage(String),

    #[error("Invalid limit: {0}")]
    InvalidLimit(String),

    #[error("Invalid categoryId: {0}")]
    InvalidCategory(String),

    #[error("Invalid year: {0}")]
    InvalidYear(String),

    #[error("Invalid column name: {0}")]
    InvalidColumn(String),
}

impl FilterError {
    /// Query parameter the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            FilterError::InvalidPage(_) => "page",
            FilterError::InvalidLimit(_) => "limit",
            FilterError::InvalidCategory(_) => "categoryId",
            FilterError::InvalidYear(_) => "year",
            FilterError::InvalidColumn(_) => "order",
        }
    }
}
