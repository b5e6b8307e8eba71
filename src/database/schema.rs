use sqlx::PgPool;

use super::manager::DatabaseError;

/// Idempotent schema bootstrap, run once at server startup.
///
/// Referential integrity and cascade rules live here: deleting a lane removes
/// its memories and, transitively, their images; tag deletion is guarded at
/// the handler level instead (a referenced tag is a 409, not a cascade).
pub async fn ensure_schema(pool: &PgPool) -> Result<(), DatabaseError> {
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            name TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS lanes (
            id UUID PRIMARY KEY,
            user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            slug TEXT NOT NULL,
            title TEXT NOT NULL,
            description TEXT,
            cover_image_url TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            UNIQUE (user_id, slug)
        )"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS memories (
            id UUID PRIMARY KEY,
            lane_id UUID NOT NULL REFERENCES lanes(id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            description TEXT,
            occurred_at TIMESTAMPTZ NOT NULL,
            sort_index INT NOT NULL DEFAULT 0 CHECK (sort_index >= 0),
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS memory_images (
            id UUID PRIMARY KEY,
            memory_id UUID NOT NULL REFERENCES memories(id) ON DELETE CASCADE,
            url TEXT NOT NULL,
            alt_text TEXT,
            sort_index INT NOT NULL DEFAULT 0 CHECK (sort_index >= 0),
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS tags (
            id UUID PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            color TEXT NOT NULL DEFAULT '#3B82F6',
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS lane_tags (
            lane_id UUID NOT NULL REFERENCES lanes(id) ON DELETE CASCADE,
            tag_id UUID NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
            PRIMARY KEY (lane_id, tag_id)
        )"#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_lanes_user ON lanes(user_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_memories_lane ON memories(lane_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_memory_images_memory ON memory_images(memory_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_lane_tags_tag ON lane_tags(tag_id)")
        .execute(pool)
        .await?;

    Ok(())
}
