use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::ApiError;

/// `works` row joined with its category name, as read from the database.
#[derive(Debug, Clone, FromRow)]
pub struct WorkRow {
    pub id: i64,
    pub title: String,
    pub category_id: i64,
    pub category_name: Option<String>,
    pub description: Option<String>,
    pub event_date: NaiveDate,
    pub thumbnail_image: Option<String>,
    pub content_images: Option<String>,
    pub is_active: bool,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client-facing work with `content_images` decoded into a list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Work {
    pub id: i64,
    pub title: String,
    pub category_id: i64,
    pub category_name: Option<String>,
    pub description: Option<String>,
    pub event_date: NaiveDate,
    pub thumbnail_image: Option<String>,
    pub content_images: Vec<String>,
    pub is_active: bool,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<WorkRow> for Work {
    fn from(row: WorkRow) -> Self {
        let content_images = decode_content_images(row.content_images.as_deref(), row.id);
        Self {
            id: row.id,
            title: row.title,
            category_id: row.category_id,
            category_name: row.category_name,
            description: row.description,
            event_date: row.event_date,
            thumbnail_image: row.thumbnail_image,
            content_images,
            is_active: row.is_active,
            view_count: row.view_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Neighbour link shown on the detail page.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WorkNavItem {
    pub id: i64,
    pub title: String,
    pub thumbnail_image: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkNavigation {
    pub prev: Option<WorkNavItem>,
    pub next: Option<WorkNavItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkDetail {
    #[serde(flatten)]
    pub work: Work,
    pub navigation: WorkNavigation,
}

/// Decode the JSON text column. Anything other than a list of strings reads as empty.
pub fn decode_content_images(raw: Option<&str>, work_id: i64) -> Vec<String> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Vec::new();
    };

    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(images) => images,
        Err(e) => {
            tracing::warn!("Work {} has unreadable content_images ({}); using []", work_id, e);
            Vec::new()
        }
    }
}

pub fn encode_content_images(images: &[String]) -> String {
    serde_json::to_string(images).unwrap_or_else(|_| "[]".to_string())
}

fn parse_event_date(raw: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ApiError::invalid_field("eventDate", "eventDate must be a date in YYYY-MM-DD format"))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWork {
    pub title: Option<String>,
    pub category_id: Option<i64>,
    pub description: Option<String>,
    pub event_date: Option<String>,
    pub thumbnail_image: Option<String>,
    pub content_images: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

/// A create request that passed validation.
#[derive(Debug, Clone)]
pub struct ValidatedWork {
    pub title: String,
    pub category_id: i64,
    pub description: Option<String>,
    pub event_date: NaiveDate,
    pub thumbnail_image: Option<String>,
    pub content_images: Vec<String>,
    pub is_active: bool,
}

impl NewWork {
    pub fn validate(self) -> Result<ValidatedWork, ApiError> {
        let title = non_blank(self.title)
            .ok_or_else(|| ApiError::invalid_field("title", "Title is required"))?;
        let category_id = self
            .category_id
            .ok_or_else(|| ApiError::invalid_field("categoryId", "categoryId is required"))?;
        let event_date = match self.event_date.as_deref() {
            Some(raw) => parse_event_date(raw)?,
            None => return Err(ApiError::invalid_field("eventDate", "eventDate is required")),
        };

        Ok(ValidatedWork {
            title,
            category_id,
            description: non_blank(self.description),
            event_date,
            thumbnail_image: non_blank(self.thumbnail_image),
            content_images: self.content_images.unwrap_or_default(),
            is_active: self.is_active.unwrap_or(true),
        })
    }
}

/// Partial update; absent fields keep their stored value, and a blank
/// `description` or `thumbnailImage` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkPatch {
    pub title: Option<String>,
    pub category_id: Option<i64>,
    pub description: Option<String>,
    pub event_date: Option<String>,
    pub thumbnail_image: Option<String>,
    pub content_images: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct WorkChanges {
    pub title: Option<String>,
    pub category_id: Option<i64>,
    /// `Some(None)` clears the column.
    pub description: Option<Option<String>>,
    pub event_date: Option<NaiveDate>,
    /// `Some(None)` clears the column.
    pub thumbnail_image: Option<Option<String>>,
    pub content_images: Option<String>,
    pub is_active: Option<bool>,
}

impl WorkPatch {
    pub fn validate(self) -> Result<WorkChanges, ApiError> {
        let title = match self.title {
            Some(raw) => Some(
                non_blank(Some(raw))
                    .ok_or_else(|| ApiError::invalid_field("title", "Title cannot be blank"))?,
            ),
            None => None,
        };
        let event_date = match self.event_date.as_deref() {
            Some(raw) => Some(parse_event_date(raw)?),
            None => None,
        };

        Ok(WorkChanges {
            title,
            category_id: self.category_id,
            description: self.description.map(|raw| non_blank(Some(raw))),
            event_date,
            thumbnail_image: self.thumbnail_image.map(|raw| non_blank(Some(raw))),
            content_images: self.content_images.as_deref().map(encode_content_images),
            is_active: self.is_active,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_images_round_trip() {
        let images = vec!["/uploads/a.png".to_string(), "/uploads/b.jpg".to_string()];
        let encoded = encode_content_images(&images);
        assert_eq!(decode_content_images(Some(&encoded), 1), images);
    }

    #[test]
    fn corrupted_content_images_decode_to_empty() {
        assert!(decode_content_images(Some("not json"), 1).is_empty());
        assert!(decode_content_images(Some("{\"a\":1}"), 1).is_empty());
        assert!(decode_content_images(Some("[1, 2]"), 1).is_empty());
        assert!(decode_content_images(Some(""), 1).is_empty());
        assert!(decode_content_images(None, 1).is_empty());
    }

    fn new_work() -> NewWork {
        NewWork {
            title: Some("  Spring Campaign ".to_string()),
            category_id: Some(3),
            description: None,
            event_date: Some("2026-03-14".to_string()),
            thumbnail_image: None,
            content_images: None,
            is_active: None,
        }
    }

    #[test]
    fn create_defaults() {
        let work = new_work().validate().unwrap();
        assert_eq!(work.title, "Spring Campaign");
        assert!(work.is_active);
        assert!(work.content_images.is_empty());
        assert_eq!(work.event_date, NaiveDate::from_ymd_opt(2026, 3, 14).unwrap());
    }

    #[test]
    fn create_requires_title_and_valid_date() {
        let mut work = new_work();
        work.title = Some(" ".to_string());
        assert!(work.validate().is_err());

        let mut work = new_work();
        work.event_date = Some("14/03/2026".to_string());
        let err = work.validate().unwrap_err();
        assert!(err.to_json()["fieldErrors"]["eventDate"].is_string());

        let mut work = new_work();
        work.category_id = None;
        assert!(work.validate().is_err());
    }

    #[test]
    fn patch_keeps_absent_fields_unset() {
        let changes = WorkPatch {
            is_active: Some(true),
            ..WorkPatch::default()
        }
        .validate()
        .unwrap();
        assert_eq!(changes.is_active, Some(true));
        assert!(changes.title.is_none());
        assert!(changes.content_images.is_none());
    }

    #[test]
    fn blank_optional_text_clears_on_patch() {
        let changes = WorkPatch {
            description: Some("   ".to_string()),
            thumbnail_image: Some("".to_string()),
            ..WorkPatch::default()
        }
        .validate()
        .unwrap();
        assert_eq!(changes.description, Some(None));
        assert_eq!(changes.thumbnail_image, Some(None));

        let changes = WorkPatch {
            thumbnail_image: Some(" /uploads/t.png ".to_string()),
            ..WorkPatch::default()
        }
        .validate()
        .unwrap();
        assert_eq!(changes.thumbnail_image, Some(Some("/uploads/t.png".to_string())));
        assert_eq!(changes.description, None);
    }

    #[test]
    fn detail_flattens_work_fields() {
        let row = WorkRow {
            id: 9,
            title: "Poster".to_string(),
            category_id: 1,
            category_name: Some("Print".to_string()),
            description: None,
            event_date: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
            thumbnail_image: None,
            content_images: Some("[\"x.png\"]".to_string()),
            is_active: true,
            view_count: 4,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let detail = WorkDetail {
            work: row.into(),
            navigation: WorkNavigation { prev: None, next: None },
        };
        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["categoryName"], "Print");
        assert_eq!(value["eventDate"], "2025-01-02");
        assert_eq!(value["contentImages"][0], "x.png");
        assert!(value["navigation"]["prev"].is_null());
    }
}
