// handlers/protected/categories.rs - admin CRUD for work categories

use axum::{extract::Path, Extension};
use serde_json::{json, Value};

use crate::database::models::{Category, CategoryInput, CategoryWithCount};
use crate::database::CategoryRepository;
use crate::handlers::{parse_id, pool};
use crate::middleware::{ApiJson, ApiResponse, ApiResult, AuthAdmin};

/// GET /api/admin/categories - all categories with their work counts
pub async fn categories_get() -> ApiResult<Vec<CategoryWithCount>> {
    let categories = CategoryRepository::new(pool()?).list_with_counts().await?;
    Ok(ApiResponse::success(categories))
}

/// POST /api/admin/categories
pub async fn categories_post(ApiJson(body): ApiJson<CategoryInput>) -> ApiResult<Category> {
    let name = body.required_name()?;
    let category = CategoryRepository::new(pool()?)
        .create(&name, body.is_active.unwrap_or(true))
        .await?;
    Ok(ApiResponse::created(category).with_message("Category created"))
}

/// PUT /api/admin/categories/:id - rename and/or toggle visibility
pub async fn category_put(Path(id): Path<String>, ApiJson(body): ApiJson<CategoryInput>) -> ApiResult<Category> {
    let id = parse_id(&id, "id")?;
    let name = body.optional_name()?;
    let category = CategoryRepository::new(pool()?)
        .update(id, name, body.is_active)
        .await?;
    Ok(ApiResponse::success(category).with_message("Category updated"))
}

/// DELETE /api/admin/categories/:id - refused while any work still uses it
pub async fn category_delete(
    Extension(admin): Extension<AuthAdmin>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let id = parse_id(&id, "id")?;
    CategoryRepository::new(pool()?).delete(id).await?;
    tracing::info!("Admin '{}' deleted category {}", admin.username, id);
    Ok(ApiResponse::success(json!({ "id": id })).with_message("Category deleted"))
}
