use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Public filter-tab entry.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CategorySummary {
    pub id: i64,
    pub name: String,
}

/// Admin listing row with the number of works referencing the category.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CategoryWithCount {
    pub id: i64,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub work_count: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

impl CategoryInput {
    /// Trimmed name, required on create.
    pub fn required_name(&self) -> Result<String, ApiError> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ApiError::invalid_field("name", "Category name is required"))
    }

    /// Trimmed name if supplied; a supplied blank name is rejected.
    pub fn optional_name(&self) -> Result<Option<String>, ApiError> {
        match self.name.as_deref() {
            None => Ok(None),
            Some(_) => self.required_name().map(Some),
        }
    }
}
