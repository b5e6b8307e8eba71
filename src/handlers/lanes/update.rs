use axum::{extract::Path, Json};
use uuid::Uuid;

use super::utils::{find_owned_lane, lane_detail, replace_tags};
use crate::database::models::lane::UpdateLaneRequest;
use crate::database::models::{Lane, LaneDetail};
use crate::database::DatabaseManager;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::slug::unique_slug;

/// PUT /lanes/:id - Partial update, owner only. Regenerates the slug only
/// when the title actually changes; updating a title to its current value
/// leaves the slug alone.
pub async fn update(
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLaneRequest>,
) -> ApiResult<LaneDetail> {
    payload.validate()?;

    let pool = DatabaseManager::pool().await?;
    let existing = find_owned_lane(&pool, id, user.id).await?;

    let title_changed = payload
        .title
        .as_deref()
        .is_some_and(|t| t != existing.title);
    let slug = if title_changed {
        unique_slug(&pool, payload.title.as_deref().unwrap_or_default(), user.id, Some(id)).await?
    } else {
        existing.slug.clone()
    };

    let lane = sqlx::query_as::<_, Lane>(
        "UPDATE lanes
         SET title = $2, description = $3, cover_image_url = $4, slug = $5, updated_at = now()
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(payload.title.as_deref().unwrap_or(&existing.title))
    .bind(payload.description.as_deref().or(existing.description.as_deref()))
    .bind(payload.cover_image_url.as_deref().or(existing.cover_image_url.as_deref()))
    .bind(&slug)
    .fetch_one(&pool)
    .await?;

    if let Some(tag_ids) = &payload.tag_ids {
        replace_tags(&pool, id, tag_ids).await?;
    }

    let detail = lane_detail(&pool, lane).await?;
    Ok(ApiResponse::success(detail).message("Memory lane updated successfully"))
}
