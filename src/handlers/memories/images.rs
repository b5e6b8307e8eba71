use axum::extract::{Multipart, Path};
use uuid::Uuid;

use super::find_owned_memory;
use crate::database::models::MemoryImage;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::storage;

/// POST /memories/:id/images - Multipart image upload into an owned memory.
///
/// Every file is validated (declared type and size) before anything is
/// stored; new images get sequential sort indices continuing from the
/// current maximum, in submission order.
pub async fn upload_images(
    AuthUser(user): AuthUser,
    Path(memory_id): Path<Uuid>,
    mut multipart: Multipart,
) -> ApiResult<Vec<MemoryImage>> {
    let pool = DatabaseManager::pool().await?;
    find_owned_memory(&pool, memory_id, user.id).await?;

    let mut files: Vec<(String, Vec<u8>)> = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("images") {
            continue;
        }
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?;

        storage::validate_image(content_type.as_deref(), bytes.len())?;
        files.push((content_type.unwrap_or_default(), bytes.to_vec()));
    }

    if files.is_empty() {
        return Err(ApiError::bad_request("No images provided"));
    }

    let start_index: i32 = sqlx::query_scalar(
        "SELECT COALESCE(MAX(sort_index) + 1, 0) FROM memory_images WHERE memory_id = $1",
    )
    .bind(memory_id)
    .fetch_one(&pool)
    .await?;

    for (offset, (content_type, bytes)) in files.iter().enumerate() {
        let stored = storage::store(content_type, bytes).await?;
        sqlx::query(
            "INSERT INTO memory_images (id, memory_id, url, sort_index) VALUES ($1, $2, $3, $4)",
        )
        .bind(Uuid::new_v4())
        .bind(memory_id)
        .bind(&stored.url)
        .bind(start_index + offset as i32)
        .execute(&pool)
        .await?;
    }

    let images = sqlx::query_as::<_, MemoryImage>(
        "SELECT * FROM memory_images WHERE memory_id = $1 ORDER BY sort_index ASC",
    )
    .bind(memory_id)
    .fetch_all(&pool)
    .await?;

    tracing::info!(%memory_id, count = files.len(), "images uploaded");

    Ok(ApiResponse::created(images).message("Images uploaded successfully"))
}
