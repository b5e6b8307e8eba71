use axum::extract::{Path, Query};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::database::models::tag::{CreateTagRequest, UpdateTagRequest, DEFAULT_TAG_COLOR};
use crate::database::models::{Tag, TagWithCount};
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, MaybeUser};

#[derive(Debug, Default, Deserialize)]
pub struct TagQuery {
    pub search: Option<String>,
}

/// GET /tags - All tags with lane usage counts, name-sorted.
pub async fn list(_user: MaybeUser, Query(query): Query<TagQuery>) -> ApiResult<Vec<TagWithCount>> {
    let pool = DatabaseManager::pool().await?;

    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let tags = sqlx::query_as::<_, TagWithCount>(
        "SELECT t.id, t.name, t.color, t.created_at, COUNT(lt.lane_id) AS lane_count \
         FROM tags t \
         LEFT JOIN lane_tags lt ON lt.tag_id = t.id \
         WHERE ($1::text IS NULL OR t.name ILIKE '%' || $1 || '%') \
         GROUP BY t.id \
         ORDER BY t.name ASC",
    )
    .bind(search)
    .fetch_all(&pool)
    .await?;

    Ok(ApiResponse::success(tags))
}

/// POST /tags - Create a tag. Names are globally unique, case sensitive.
pub async fn create(
    AuthUser(_user): AuthUser,
    axum::Json(payload): axum::Json<CreateTagRequest>,
) -> ApiResult<Tag> {
    payload.validate()?;
    let pool = DatabaseManager::pool().await?;

    let exists: Option<i32> = sqlx::query_scalar("SELECT 1 FROM tags WHERE name = $1")
        .bind(&payload.name)
        .fetch_optional(&pool)
        .await?;
    if exists.is_some() {
        return Err(ApiError::conflict("Tag with this name already exists"));
    }

    let color = payload.color.as_deref().unwrap_or(DEFAULT_TAG_COLOR);
    let tag = sqlx::query_as::<_, Tag>(
        "INSERT INTO tags (id, name, color) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(&payload.name)
    .bind(color)
    .fetch_one(&pool)
    .await?;

    Ok(ApiResponse::created(tag).message("Tag created successfully"))
}

/// PUT /tags/:id - Rename or recolor a tag.
pub async fn update(
    AuthUser(_user): AuthUser,
    Path(tag_id): Path<Uuid>,
    axum::Json(payload): axum::Json<UpdateTagRequest>,
) -> ApiResult<Tag> {
    payload.validate()?;
    let pool = DatabaseManager::pool().await?;

    let existing = sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE id = $1")
        .bind(tag_id)
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Tag not found"))?;

    if let Some(name) = payload.name.as_deref() {
        if name != existing.name {
            let taken: Option<i32> =
                sqlx::query_scalar("SELECT 1 FROM tags WHERE name = $1 AND id <> $2")
                    .bind(name)
                    .bind(tag_id)
                    .fetch_optional(&pool)
                    .await?;
            if taken.is_some() {
                return Err(ApiError::conflict("Tag with this name already exists"));
            }
        }
    }

    let tag = sqlx::query_as::<_, Tag>(
        "UPDATE tags SET name = $1, color = $2 WHERE id = $3 RETURNING *",
    )
    .bind(payload.name.as_deref().unwrap_or(&existing.name))
    .bind(payload.color.as_deref().unwrap_or(&existing.color))
    .bind(tag_id)
    .fetch_one(&pool)
    .await?;

    Ok(ApiResponse::success(tag).message("Tag updated successfully"))
}

/// DELETE /tags/:id - Refused while any lane still references the tag.
pub async fn delete(AuthUser(_user): AuthUser, Path(tag_id): Path<Uuid>) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;

    sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE id = $1")
        .bind(tag_id)
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Tag not found"))?;

    let refs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lane_tags WHERE tag_id = $1")
        .bind(tag_id)
        .fetch_one(&pool)
        .await?;
    if refs > 0 {
        return Err(ApiError::conflict(
            "Cannot delete tag that is being used by memory lanes",
        ));
    }

    sqlx::query("DELETE FROM tags WHERE id = $1")
        .bind(tag_id)
        .execute(&pool)
        .await?;

    Ok(ApiResponse::success(Value::Null).message("Tag deleted successfully"))
}
