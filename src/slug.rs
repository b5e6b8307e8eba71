use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;

/// Deterministic text-to-slug transform: lowercase, keep ASCII alphanumerics
/// only, collapse separator runs to single hyphens, trim leading/trailing
/// hyphens. Non-ASCII letters are dropped, never carried through uppercase.
pub fn slugify(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    for c in title.trim().chars() {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_alphanumeric() {
            out.push(c);
        } else if c.is_whitespace() || c == '-' || c == '_' {
            if !out.ends_with('-') {
                out.push('-');
            }
        }
        // everything else is dropped
    }
    out.trim_matches('-').to_string()
}

/// Compute a slug for `title` that is unique within `user_id`'s lanes,
/// excluding `exclude_id` when updating an existing lane.
///
/// Collisions are resolved by appending `-1`, `-2`, ... The probe loop is
/// bounded at the owner's current lane count + 1, which always leaves at
/// least one free candidate; exhausting it means the storage changed under
/// us and is reported as a conflict.
pub async fn unique_slug(
    pool: &PgPool,
    title: &str,
    user_id: Uuid,
    exclude_id: Option<Uuid>,
) -> Result<String, ApiError> {
    let mut base = slugify(title);
    if base.is_empty() {
        base = "lane".to_string();
    }

    let lane_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM lanes WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;

    for n in 0..=lane_count {
        let candidate = if n == 0 { base.clone() } else { format!("{}-{}", base, n) };

        let taken: Option<i32> = sqlx::query_scalar(
            "SELECT 1 FROM lanes
             WHERE user_id = $1 AND slug = $2 AND ($3::uuid IS NULL OR id <> $3)",
        )
        .bind(user_id)
        .bind(&candidate)
        .bind(exclude_id)
        .fetch_optional(pool)
        .await?;

        if taken.is_none() {
            return Ok(candidate);
        }
    }

    Err(ApiError::conflict("Could not allocate a unique slug"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_hyphenates() {
        assert_eq!(slugify("Summer Trip"), "summer-trip");
        assert_eq!(slugify("Trip"), "trip");
    }

    #[test]
    fn strips_special_characters() {
        assert_eq!(slugify("Tokyo! 2024 (spring)"), "tokyo-2024-spring");
        assert_eq!(slugify("café & bar"), "caf-bar");
    }

    #[test]
    fn never_emits_uppercase() {
        let slug = slugify("CAFÉ TRIP");
        assert_eq!(slug, "caf-trip");
        assert!(!slug.chars().any(char::is_uppercase));
    }

    #[test]
    fn collapses_separator_runs() {
        assert_eq!(slugify("a   b__c--d"), "a-b-c-d");
    }

    #[test]
    fn trims_leading_and_trailing_hyphens() {
        assert_eq!(slugify("  --hello--  "), "hello");
    }

    #[test]
    fn pure_punctuation_becomes_empty() {
        assert_eq!(slugify("!!!"), "");
    }
}
