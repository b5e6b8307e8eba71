use axum::extract::Path;
use serde_json::Value;
use uuid::Uuid;

use super::utils::find_owned_lane;
use crate::database::DatabaseManager;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// DELETE /lanes/:id - Owner-only delete; the schema's cascade rules remove
/// the lane's memories and, transitively, their images.
pub async fn delete(AuthUser(user): AuthUser, Path(id): Path<Uuid>) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;
    let lane = find_owned_lane(&pool, id, user.id).await?;

    sqlx::query("DELETE FROM lanes WHERE id = $1")
        .bind(lane.id)
        .execute(&pool)
        .await?;

    tracing::info!(lane_id = %lane.id, user_id = %user.id, "lane deleted");

    Ok(ApiResponse::success(Value::Null).message("Memory lane deleted successfully"))
}
