use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config;

/// Raw query parameters shared by the list endpoints. Out-of-range values
/// are clamped rather than rejected.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub tag_id: Option<Uuid>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
    pub offset: i64,
}

impl ListQuery {
    pub fn page_request(&self) -> PageRequest {
        let cfg = &config::config().pagination;
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(cfg.default_limit).clamp(1, cfg.max_limit);
        PageRequest { page, limit, offset: (page - 1) * limit }
    }

    /// Trimmed search term, empty strings dropped.
    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// Resolve the sort column against a whitelist of (api name, column)
    /// pairs; unknown fields fall back to the default (first entry).
    pub fn sort(&self, allowed: &[(&str, &str)]) -> (String, String) {
        let column = self
            .sort_by
            .as_deref()
            .and_then(|requested| {
                allowed
                    .iter()
                    .find(|(api_name, _)| *api_name == requested)
                    .map(|(_, col)| *col)
            })
            .unwrap_or(allowed[0].1);

        let direction = match self.sort_order.as_deref() {
            Some("asc") => "ASC",
            _ => "DESC",
        };

        (column.to_string(), direction.to_string())
    }
}

/// Derived pagination metadata; no hidden state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let total_pages = (total + limit - 1) / limit;
        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}
