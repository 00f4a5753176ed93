// handlers/public/categories.rs - filter tabs for the portfolio page

use crate::database::models::CategorySummary;
use crate::database::CategoryRepository;
use crate::handlers::pool;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/categories - active categories in creation order
pub async fn categories_get() -> ApiResult<Vec<CategorySummary>> {
    let categories = CategoryRepository::new(pool()?).list_active().await?;
    Ok(ApiResponse::success(categories))
}
