// handlers/protected/upload.rs - image uploads for works
//
// One multipart field named `file`. The bytes are buffered whole, checked
// against the per-endpoint ceiling and the declared type, sniffed for their
// real type, then handed to the configured ImageStore.

use axum::{
    extract::{multipart::MultipartError, Multipart},
    http::StatusCode,
    Extension,
};

use crate::config::config;
use crate::middleware::{ApiResponse, ApiResult, AuthAdmin};
use crate::services::upload::validate_image;
use crate::services::{image_store, UploadError, UploadKind, UploadedImage};

/// POST /api/admin/upload/thumbnail - list-card image, 10 MB ceiling by default
pub async fn upload_thumbnail_post(
    Extension(admin): Extension<AuthAdmin>,
    multipart: Multipart,
) -> ApiResult<UploadedImage> {
    store_upload(UploadKind::Thumbnail, &admin, multipart).await
}

/// POST /api/admin/upload/content - detail-page image, 50 MB ceiling by default
pub async fn upload_content_post(
    Extension(admin): Extension<AuthAdmin>,
    multipart: Multipart,
) -> ApiResult<UploadedImage> {
    store_upload(UploadKind::Content, &admin, multipart).await
}

async fn store_upload(kind: UploadKind, admin: &AuthAdmin, mut multipart: Multipart) -> ApiResult<UploadedImage> {
    let max_bytes = kind.max_bytes(&config().upload);

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_bytes))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let declared = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(|e| multipart_error(e, max_bytes))?;
        let image = validate_image(declared.as_deref(), &bytes, max_bytes)?;
        let size = bytes.len();

        let url = image_store()?.store(kind, image, bytes).await?;
        tracing::info!("Admin '{}' uploaded {} ({} bytes) to {}", admin.username, image.mime(), size, url);

        return Ok(ApiResponse::success(UploadedImage {
            url,
            size,
            mime_type: image.mime().to_string(),
        }));
    }

    Err(UploadError::MissingFile.into())
}

/// A body cut off by the route's size limit reads as a too-large file.
fn multipart_error(err: MultipartError, max_bytes: usize) -> UploadError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UploadError::TooLarge { limit: max_bytes }
    } else {
        UploadError::Multipart(err.body_text())
    }
}
