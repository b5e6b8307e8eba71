pub mod delete;
pub mod images;
pub mod update;

use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::Memory;
use crate::error::ApiError;

/// Fetch a memory whose parent lane is owned by `user_id`. Memories carry no
/// owner field of their own; ownership is always transitive through the
/// lane, and a miss never reveals whether the memory exists.
pub async fn find_owned_memory(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
) -> Result<Memory, ApiError> {
    sqlx::query_as::<_, Memory>(
        "SELECT m.* FROM memories m
         JOIN lanes l ON l.id = m.lane_id
         WHERE m.id = $1 AND l.user_id = $2",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Memory not found"))
}

pub use delete::delete;
pub use images::upload_images;
pub use update::update;
