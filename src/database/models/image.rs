use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A single photo attached to a memory. The URL points at externally hosted
/// object storage; sort_index orders images within their memory.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MemoryImage {
    pub id: Uuid,
    pub memory_id: Uuid,
    pub url: String,
    pub alt_text: Option<String>,
    pub sort_index: i32,
    pub created_at: DateTime<Utc>,
}
