use axum::extract::Path;
use serde_json::Value;
use uuid::Uuid;

use crate::database::models::MemoryImage;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::storage;

/// DELETE /images/:id - Remove a single image from the owner's memory.
///
/// Remaining images keep their sort indices; gaps are fine. A foreign or
/// unknown image id reads as 404, never 403.
pub async fn delete(AuthUser(user): AuthUser, Path(image_id): Path<Uuid>) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;

    let image = sqlx::query_as::<_, MemoryImage>(
        "SELECT mi.* FROM memory_images mi \
         JOIN memories m ON m.id = mi.memory_id \
         JOIN lanes l ON l.id = m.lane_id \
         WHERE mi.id = $1 AND l.user_id = $2",
    )
    .bind(image_id)
    .bind(user.id)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Image not found"))?;

    storage::remove(&image.url).await;

    sqlx::query("DELETE FROM memory_images WHERE id = $1")
        .bind(image_id)
        .execute(&pool)
        .await?;

    Ok(ApiResponse::success(Value::Null).message("Image deleted successfully"))
}
