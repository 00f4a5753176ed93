use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: i64,
    pub year: i32,
    pub date: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Timeline bucket for one year.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryYear {
    pub year: i32,
    pub entries: Vec<HistoryEntry>,
}

/// Create/update body. A client-sent `year` is ignored; it is always derived from `date`.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryInput {
    pub date: Option<String>,
    pub description: Option<String>,
}

/// A history write with the year already derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedHistory {
    pub year: i32,
    pub date: String,
    pub description: String,
}

impl HistoryInput {
    pub fn validate(self) -> Result<ValidatedHistory, ApiError> {
        let date = self
            .date
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .ok_or_else(|| ApiError::invalid_field("date", "Date is required"))?;
        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .ok_or_else(|| ApiError::invalid_field("description", "Description is required"))?;
        let year = derive_year(&date)
            .ok_or_else(|| ApiError::invalid_field("date", "Date must contain a 4-digit year"))?;

        Ok(ValidatedHistory {
            year,
            date,
            description,
        })
    }
}

/// First run of exactly four ASCII digits in `date`.
pub fn derive_year(date: &str) -> Option<i32> {
    let bytes = date.as_bytes();
    let mut start = 0;
    while start < bytes.len() {
        if !bytes[start].is_ascii_digit() {
            start += 1;
            continue;
        }
        let mut end = start;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end - start == 4 {
            return date[start..end].parse().ok();
        }
        start = end;
    }
    None
}

/// Group entries already sorted by year descending into per-year buckets.
pub fn group_by_year(entries: Vec<HistoryEntry>) -> Vec<HistoryYear> {
    let mut years: Vec<HistoryYear> = Vec::new();
    for entry in entries {
        match years.last_mut() {
            Some(bucket) if bucket.year == entry.year => bucket.entries.push(entry),
            _ => years.push(HistoryYear {
                year: entry.year,
                entries: vec![entry],
            }),
        }
    }
    years
}
