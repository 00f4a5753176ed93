use serde::Serialize;
use thiserror::Error;

use crate::config::UploadConfig;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No file provided in field 'file'")]
    MissingFile,

    #[error("Uploaded file is empty")]
    Empty,

    #[error("File too large. Maximum size is {} MB", .limit / (1024 * 1024))]
    TooLarge { limit: usize },

    #[error("Unsupported file type. Allowed: JPEG, PNG, WebP")]
    UnsupportedType,

    #[error("File content does not match declared type {declared}")]
    TypeMismatch { declared: String },

    #[error("Invalid multipart data: {0}")]
    Multipart(String),

    #[error("Storage failure: {0}")]
    Storage(String),

    #[error("Upstream upload failure: {0}")]
    Upstream(String),
}

/// Accepted image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Webp,
}

impl ImageKind {
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.split(';').next().map(str::trim) {
            Some("image/jpeg") | Some("image/jpg") => Some(ImageKind::Jpeg),
            Some("image/png") => Some(ImageKind::Png),
            Some("image/webp") => Some(ImageKind::Webp),
            _ => None,
        }
    }

    /// Detect the format from the file's leading bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [0xFF, 0xD8, 0xFF, ..] => Some(ImageKind::Jpeg),
            [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some(ImageKind::Png),
            [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Some(ImageKind::Webp),
            _ => None,
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Png => "image/png",
            ImageKind::Webp => "image/webp",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "jpg",
            ImageKind::Png => "png",
            ImageKind::Webp => "webp",
        }
    }
}

/// Which upload endpoint a file arrived on; decides the size ceiling and subdirectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadKind {
    Thumbnail,
    Content,
}

impl UploadKind {
    pub fn max_bytes(&self, config: &UploadConfig) -> usize {
        match self {
            UploadKind::Thumbnail => config.thumbnail_max_bytes,
            UploadKind::Content => config.content_max_bytes,
        }
    }

    pub fn dir(&self) -> &'static str {
        match self {
            UploadKind::Thumbnail => "thumbnails",
            UploadKind::Content => "content",
        }
    }
}

/// Check size, declared type and magic bytes. The declared type is optional;
/// when present it must agree with what the bytes say.
pub fn validate_image(
    declared: Option<&str>,
    bytes: &[u8],
    max_bytes: usize,
) -> Result<ImageKind, UploadError> {
    if bytes.is_empty() {
        return Err(UploadError::Empty);
    }
    if bytes.len() > max_bytes {
        return Err(UploadError::TooLarge { limit: max_bytes });
    }

    let declared_kind = match declared {
        Some(mime) => Some(ImageKind::from_mime(mime).ok_or(UploadError::UnsupportedType)?),
        None => None,
    };
    let detected = ImageKind::sniff(bytes).ok_or(UploadError::UnsupportedType)?;

    match declared_kind {
        Some(kind) if kind != detected => Err(UploadError::TypeMismatch {
            declared: kind.mime().to_string(),
        }),
        _ => Ok(detected),
    }
}

/// Response body for a stored upload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    pub url: String,
    pub size: usize,
    pub mime_type: String,
}
