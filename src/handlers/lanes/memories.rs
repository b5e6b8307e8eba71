use axum::{
    extract::{Path, Query},
    Json,
};
use std::collections::HashMap;
use uuid::Uuid;

use super::utils::find_owned_lane;
use crate::database::models::memory::CreateMemoryRequest;
use crate::database::models::{Memory, MemoryImage, MemoryWithImages};
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, MaybeUser};
use crate::pagination::{ListQuery, Paginated, PaginationMeta};

const MEMORY_SORT_FIELDS: &[(&str, &str)] = &[
    ("createdAt", "created_at"),
    ("occurredAt", "occurred_at"),
    ("sortIndex", "sort_index"),
    ("title", "title"),
];

/// GET /lanes/:id/memories - Public paginated memories for a lane
pub async fn list(
    _user: MaybeUser,
    Path(lane_id): Path<Uuid>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Paginated<MemoryWithImages>> {
    let pool = DatabaseManager::pool().await?;

    let exists: Option<i32> = sqlx::query_scalar("SELECT 1 FROM lanes WHERE id = $1")
        .bind(lane_id)
        .fetch_optional(&pool)
        .await?;
    if exists.is_none() {
        return Err(ApiError::not_found("Memory lane not found"));
    }

    let page = query.page_request();
    let (sort_column, sort_dir) = query.sort(MEMORY_SORT_FIELDS);

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM memories WHERE lane_id = $1")
        .bind(lane_id)
        .fetch_one(&pool)
        .await?;

    let sql = format!(
        "SELECT * FROM memories WHERE lane_id = $1 ORDER BY {} {} LIMIT $2 OFFSET $3",
        sort_column, sort_dir
    );
    let memories = sqlx::query_as::<_, Memory>(&sql)
        .bind(lane_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&pool)
        .await?;

    let memory_ids: Vec<Uuid> = memories.iter().map(|m| m.id).collect();
    let images = sqlx::query_as::<_, MemoryImage>(
        "SELECT * FROM memory_images WHERE memory_id = ANY($1) ORDER BY sort_index ASC",
    )
    .bind(&memory_ids)
    .fetch_all(&pool)
    .await?;

    let mut images_by_memory: HashMap<Uuid, Vec<MemoryImage>> = HashMap::new();
    for image in images {
        images_by_memory.entry(image.memory_id).or_default().push(image);
    }

    let data = memories
        .into_iter()
        .map(|memory| MemoryWithImages {
            images: images_by_memory.remove(&memory.id).unwrap_or_default(),
            memory,
        })
        .collect();

    Ok(ApiResponse::success(Paginated {
        data,
        pagination: PaginationMeta::new(page.page, page.limit, total),
    }))
}

/// POST /lanes/:id/memories - Create a memory in an owned lane. Without an
/// explicit sort index the memory appends at max(sort_index) + 1, or 0 for
/// an empty lane.
pub async fn create(
    AuthUser(user): AuthUser,
    Path(lane_id): Path<Uuid>,
    Json(payload): Json<CreateMemoryRequest>,
) -> ApiResult<MemoryWithImages> {
    let occurred_at = payload.validate()?;

    let pool = DatabaseManager::pool().await?;
    find_owned_lane(&pool, lane_id, user.id).await?;

    let memory = sqlx::query_as::<_, Memory>(
        "INSERT INTO memories (id, lane_id, title, description, occurred_at, sort_index)
         VALUES ($1, $2, $3, $4, $5,
                 (SELECT COALESCE(MAX(sort_index) + 1, 0) FROM memories WHERE lane_id = $2))
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(lane_id)
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(occurred_at)
    .fetch_one(&pool)
    .await?;

    for (index, url) in payload.images.iter().enumerate() {
        sqlx::query(
            "INSERT INTO memory_images (id, memory_id, url, sort_index) VALUES ($1, $2, $3, $4)",
        )
        .bind(Uuid::new_v4())
        .bind(memory.id)
        .bind(url)
        .bind(index as i32)
        .execute(&pool)
        .await?;
    }

    let images = sqlx::query_as::<_, MemoryImage>(
        "SELECT * FROM memory_images WHERE memory_id = $1 ORDER BY sort_index ASC",
    )
    .bind(memory.id)
    .fetch_all(&pool)
    .await?;

    tracing::info!(memory_id = %memory.id, %lane_id, "memory created");

    Ok(ApiResponse::created(MemoryWithImages { memory, images })
        .message("Memory created successfully"))
}
