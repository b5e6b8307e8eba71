use axum::extract::Path;
use uuid::Uuid;

use super::utils::lane_detail;
use crate::database::models::{Lane, LaneDetail};
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, MaybeUser};

/// GET /lanes/:id - Public lane detail with memories, images, and tags
pub async fn show(_user: MaybeUser, Path(id): Path<Uuid>) -> ApiResult<LaneDetail> {
    let pool = DatabaseManager::pool().await?;

    let lane = sqlx::query_as::<_, Lane>("SELECT * FROM lanes WHERE id = $1")
        .bind(id)
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Memory lane not found"))?;

    let detail = lane_detail(&pool, lane).await?;
    Ok(ApiResponse::success(detail))
}
