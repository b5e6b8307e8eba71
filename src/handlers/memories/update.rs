use axum::{extract::Path, Json};
use uuid::Uuid;

use super::find_owned_memory;
use crate::database::models::memory::UpdateMemoryRequest;
use crate::database::models::{Memory, MemoryImage, MemoryWithImages};
use crate::database::DatabaseManager;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// PUT /memories/:id - Partial update; when an image list is provided the
/// existing set is fully replaced in submission order.
pub async fn update(
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMemoryRequest>,
) -> ApiResult<MemoryWithImages> {
    let occurred_at = payload.validate()?;

    let pool = DatabaseManager::pool().await?;
    let existing = find_owned_memory(&pool, id, user.id).await?;

    let memory = sqlx::query_as::<_, Memory>(
        "UPDATE memories
         SET title = $2, description = $3, occurred_at = $4, updated_at = now()
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(payload.title.as_deref().unwrap_or(&existing.title))
    .bind(payload.description.as_deref().or(existing.description.as_deref()))
    .bind(occurred_at.unwrap_or(existing.occurred_at))
    .fetch_one(&pool)
    .await?;

    if let Some(urls) = &payload.images {
        sqlx::query("DELETE FROM memory_images WHERE memory_id = $1")
            .bind(id)
            .execute(&pool)
            .await?;

        for (index, url) in urls.iter().enumerate() {
            sqlx::query(
                "INSERT INTO memory_images (id, memory_id, url, sort_index) VALUES ($1, $2, $3, $4)",
            )
            .bind(Uuid::new_v4())
            .bind(id)
            .bind(url)
            .bind(index as i32)
            .execute(&pool)
            .await?;
        }
    }

    let images = sqlx::query_as::<_, MemoryImage>(
        "SELECT * FROM memory_images WHERE memory_id = $1 ORDER BY sort_index ASC",
    )
    .bind(id)
    .fetch_all(&pool)
    .await?;

    Ok(ApiResponse::success(MemoryWithImages { memory, images })
        .message("Memory updated successfully"))
}
