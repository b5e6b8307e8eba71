use axum::extract::Query;
use uuid::Uuid;

use super::utils::{summarize_lanes, LANE_SORT_FIELDS};
use crate::database::models::{Lane, LaneSummary};
use crate::database::DatabaseManager;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, MaybeUser};
use crate::pagination::{ListQuery, Paginated, PaginationMeta};

/// GET /lanes - All lanes, public, paginated and filterable
pub async fn list(_user: MaybeUser, Query(query): Query<ListQuery>) -> ApiResult<Paginated<LaneSummary>> {
    let page = list_lanes(None, &query).await?;
    Ok(ApiResponse::success(page))
}

/// GET /lanes/my - The caller's lanes, same filters as the public listing
pub async fn my(AuthUser(user): AuthUser, Query(query): Query<ListQuery>) -> ApiResult<Paginated<LaneSummary>> {
    let page = list_lanes(Some(user.id), &query).await?;
    Ok(ApiResponse::success(page))
}

async fn list_lanes(owner: Option<Uuid>, query: &ListQuery) -> Result<Paginated<LaneSummary>, crate::error::ApiError> {
    let pool = DatabaseManager::pool().await?;

    let page = query.page_request();
    let search = query.search_term();
    let (sort_column, sort_dir) = query.sort(LANE_SORT_FIELDS);

    // Search is a case-insensitive contains over title+description; the tag
    // filter matches lanes with at least one link; both AND when present.
    const FILTER: &str = "($1::uuid IS NULL OR l.user_id = $1)
        AND ($2::text IS NULL OR l.title ILIKE '%' || $2 || '%' OR l.description ILIKE '%' || $2 || '%')
        AND ($3::uuid IS NULL OR EXISTS (
            SELECT 1 FROM lane_tags lt WHERE lt.lane_id = l.id AND lt.tag_id = $3
        ))";

    let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM lanes l WHERE {}", FILTER))
        .bind(owner)
        .bind(&search)
        .bind(query.tag_id)
        .fetch_one(&pool)
        .await?;

    // Sort column and direction come from a whitelist, never from raw input.
    let sql = format!(
        "SELECT l.* FROM lanes l WHERE {} ORDER BY l.{} {} LIMIT $4 OFFSET $5",
        FILTER, sort_column, sort_dir
    );
    let lanes = sqlx::query_as::<_, Lane>(&sql)
        .bind(owner)
        .bind(&search)
        .bind(query.tag_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&pool)
        .await?;

    let data = summarize_lanes(&pool, lanes).await?;
    Ok(Paginated { data, pagination: PaginationMeta::new(page.page, page.limit, total) })
}
