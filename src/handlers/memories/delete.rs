use axum::extract::Path;
use serde_json::Value;
use uuid::Uuid;

use super::find_owned_memory;
use crate::database::DatabaseManager;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// DELETE /memories/:id - Owner-only via the parent lane; cascades to images.
/// Sibling sort indices are not renumbered (gaps are fine).
pub async fn delete(AuthUser(user): AuthUser, Path(id): Path<Uuid>) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;
    let memory = find_owned_memory(&pool, id, user.id).await?;

    sqlx::query("DELETE FROM memories WHERE id = $1")
        .bind(memory.id)
        .execute(&pool)
        .await?;

    tracing::info!(memory_id = %memory.id, "memory deleted");

    Ok(ApiResponse::success(Value::Null).message("Memory deleted successfully"))
}
