use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use uuid::Uuid;

use crate::database::models::{
    Lane, LaneDetail, LaneSummary, Memory, MemoryImage, MemoryPreview, MemoryWithImages, Tag,
};
use crate::error::ApiError;

/// Sort fields accepted by the lane list endpoints, first entry is the default.
pub const LANE_SORT_FIELDS: &[(&str, &str)] = &[
    ("createdAt", "created_at"),
    ("updatedAt", "updated_at"),
    ("title", "title"),
];

/// How many memories a lane list entry previews.
pub const PREVIEW_MEMORIES: usize = 3;

/// Fetch a lane filtered by both id and owner. A miss reads the same whether
/// the lane does not exist or belongs to someone else.
pub async fn find_owned_lane(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<Lane, ApiError> {
    sqlx::query_as::<_, Lane>("SELECT * FROM lanes WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Memory lane not found"))
}

#[derive(Debug, FromRow)]
struct LaneTagRow {
    lane_id: Uuid,
    id: Uuid,
    name: String,
    color: String,
    created_at: DateTime<Utc>,
}

async fn tags_by_lane(pool: &PgPool, lane_ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<Tag>>, ApiError> {
    let rows = sqlx::query_as::<_, LaneTagRow>(
        "SELECT lt.lane_id, t.id, t.name, t.color, t.created_at
         FROM lane_tags lt
         JOIN tags t ON t.id = lt.tag_id
         WHERE lt.lane_id = ANY($1)
         ORDER BY t.name ASC",
    )
    .bind(lane_ids)
    .fetch_all(pool)
    .await?;

    let mut map: HashMap<Uuid, Vec<Tag>> = HashMap::new();
    for row in rows {
        map.entry(row.lane_id).or_default().push(Tag {
            id: row.id,
            name: row.name,
            color: row.color,
            created_at: row.created_at,
        });
    }
    Ok(map)
}

async fn memory_counts(pool: &PgPool, lane_ids: &[Uuid]) -> Result<HashMap<Uuid, i64>, ApiError> {
    let rows = sqlx::query_as::<_, (Uuid, i64)>(
        "SELECT lane_id, COUNT(*) FROM memories WHERE lane_id = ANY($1) GROUP BY lane_id",
    )
    .bind(lane_ids)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().collect())
}

/// Attach tags, memory counts, and newest-first memory previews to a page of
/// lanes.
pub async fn summarize_lanes(pool: &PgPool, lanes: Vec<Lane>) -> Result<Vec<LaneSummary>, ApiError> {
    let lane_ids: Vec<Uuid> = lanes.iter().map(|l| l.id).collect();
    let mut tags = tags_by_lane(pool, &lane_ids).await?;
    let counts = memory_counts(pool, &lane_ids).await?;

    let previews = sqlx::query_as::<_, MemoryPreview>(
        "SELECT lane_id, id, title, occurred_at
         FROM memories WHERE lane_id = ANY($1)
         ORDER BY occurred_at DESC",
    )
    .bind(&lane_ids)
    .fetch_all(pool)
    .await?;

    let mut previews_by_lane: HashMap<Uuid, Vec<MemoryPreview>> = HashMap::new();
    for preview in previews {
        let entry = previews_by_lane.entry(preview.lane_id).or_default();
        if entry.len() < PREVIEW_MEMORIES {
            entry.push(preview);
        }
    }

    Ok(lanes
        .into_iter()
        .map(|lane| LaneSummary {
            tags: tags.remove(&lane.id).unwrap_or_default(),
            memory_count: counts.get(&lane.id).copied().unwrap_or(0),
            memories: previews_by_lane.remove(&lane.id).unwrap_or_default(),
            lane,
        })
        .collect())
}

/// Full lane shape: all memories newest-first, each with its images sorted
/// ascending, plus tags and the memory count.
pub async fn lane_detail(pool: &PgPool, lane: Lane) -> Result<LaneDetail, ApiError> {
    let memories = sqlx::query_as::<_, Memory>(
        "SELECT * FROM memories WHERE lane_id = $1 ORDER BY occurred_at DESC",
    )
    .bind(lane.id)
    .fetch_all(pool)
    .await?;

    let memory_ids: Vec<Uuid> = memories.iter().map(|m| m.id).collect();
    let images = sqlx::query_as::<_, MemoryImage>(
        "SELECT * FROM memory_images WHERE memory_id = ANY($1) ORDER BY sort_index ASC",
    )
    .bind(&memory_ids)
    .fetch_all(pool)
    .await?;

    let mut images_by_memory: HashMap<Uuid, Vec<MemoryImage>> = HashMap::new();
    for image in images {
        images_by_memory.entry(image.memory_id).or_default().push(image);
    }

    let memory_count = memories.len() as i64;
    let memories = memories
        .into_iter()
        .map(|memory| MemoryWithImages {
            images: images_by_memory.remove(&memory.id).unwrap_or_default(),
            memory,
        })
        .collect();

    let tags = tags_by_lane(pool, &[lane.id]).await?.remove(&lane.id).unwrap_or_default();

    Ok(LaneDetail { lane, tags, memory_count, memories })
}

/// Link the given tags to a lane. Nonexistent tag ids are ignored and
/// duplicate links skipped.
pub async fn link_tags(pool: &PgPool, lane_id: Uuid, tag_ids: &[Uuid]) -> Result<(), ApiError> {
    if tag_ids.is_empty() {
        return Ok(());
    }
    sqlx::query(
        "INSERT INTO lane_tags (lane_id, tag_id)
         SELECT $1, t.id FROM tags t WHERE t.id = ANY($2)
         ON CONFLICT DO NOTHING",
    )
    .bind(lane_id)
    .bind(tag_ids)
    .execute(pool)
    .await?;
    Ok(())
}

/// Full-replace tag semantics for lane updates: drop all links, insert the
/// new set. The two statements are not atomic; a crash between them leaves
/// tags partially updated (accepted tradeoff).
pub async fn replace_tags(pool: &PgPool, lane_id: Uuid, tag_ids: &[Uuid]) -> Result<(), ApiError> {
    sqlx::query("DELETE FROM lane_tags WHERE lane_id = $1")
        .bind(lane_id)
        .execute(pool)
        .await?;
    link_tags(pool, lane_id, tag_ids).await
}
