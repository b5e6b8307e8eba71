use axum::Json;
use uuid::Uuid;

use super::utils::{lane_detail, link_tags};
use crate::database::models::lane::CreateLaneRequest;
use crate::database::models::{Lane, LaneDetail};
use crate::database::DatabaseManager;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::slug::unique_slug;

/// POST /lanes - Create a lane owned by the caller
pub async fn create(
    AuthUser(user): AuthUser,
    Json(payload): Json<CreateLaneRequest>,
) -> ApiResult<LaneDetail> {
    payload.validate()?;

    let pool = DatabaseManager::pool().await?;
    let slug = unique_slug(&pool, &payload.title, user.id, None).await?;

    let lane = sqlx::query_as::<_, Lane>(
        "INSERT INTO lanes (id, user_id, slug, title, description, cover_image_url)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(user.id)
    .bind(&slug)
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(&payload.cover_image_url)
    .fetch_one(&pool)
    .await?;

    link_tags(&pool, lane.id, &payload.tag_ids).await?;

    tracing::info!(lane_id = %lane.id, user_id = %user.id, %slug, "lane created");

    let detail = lane_detail(&pool, lane).await?;
    Ok(ApiResponse::created(detail).message("Memory lane created successfully"))
}
