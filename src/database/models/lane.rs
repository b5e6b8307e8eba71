use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;
use uuid::Uuid;

use super::memory::{validate_description, validate_title, MemoryPreview, MemoryWithImages};
use super::tag::Tag;
use crate::error::ApiError;

/// A titled, chronologically-ordered collection of memories. The slug is
/// unique per owner, not globally.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Lane {
    pub id: Uuid,
    pub user_id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lane shape for list responses: tags flattened, memory count, and a short
/// newest-first preview of memories.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneSummary {
    #[serde(flatten)]
    pub lane: Lane,
    pub tags: Vec<Tag>,
    pub memory_count: i64,
    pub memories: Vec<MemoryPreview>,
}

/// Lane shape for detail responses: full memories with images.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneDetail {
    #[serde(flatten)]
    pub lane: Lane,
    pub tags: Vec<Tag>,
    pub memory_count: i64,
    pub memories: Vec<MemoryWithImages>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLaneRequest {
    pub title: String,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub tag_ids: Vec<Uuid>,
}

impl CreateLaneRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = HashMap::new();

        if let Err(msg) = validate_title(&self.title) {
            errors.insert("title".to_string(), msg);
        }
        if let Err(msg) = validate_description(self.description.as_deref()) {
            errors.insert("description".to_string(), msg);
        }
        if let Some(url) = &self.cover_image_url {
            if let Err(msg) = validate_url(url) {
                errors.insert("coverImageUrl".to_string(), msg);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_error("Validation failed", errors))
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLaneRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    /// Full-replace semantics: when present, existing links are dropped and
    /// this exact set is inserted.
    pub tag_ids: Option<Vec<Uuid>>,
}

impl UpdateLaneRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = HashMap::new();

        if let Some(title) = &self.title {
            if let Err(msg) = validate_title(title) {
                errors.insert("title".to_string(), msg);
            }
        }
        if let Err(msg) = validate_description(self.description.as_deref()) {
            errors.insert("description".to_string(), msg);
        }
        if let Some(url) = &self.cover_image_url {
            if let Err(msg) = validate_url(url) {
                errors.insert("coverImageUrl".to_string(), msg);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_error("Validation failed", errors))
        }
    }
}

fn validate_url(raw: &str) -> Result<(), String> {
    url::Url::parse(raw)
        .map(|_| ())
        .map_err(|_| "Please enter a valid URL".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_lane_requires_title() {
        let req = CreateLaneRequest {
            title: String::new(),
            description: None,
            cover_image_url: None,
            tag_ids: vec![],
        };
        match req.validate() {
            Err(ApiError::ValidationError { field_errors, .. }) => {
                assert!(field_errors.contains_key("title"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn cover_image_url_must_be_a_url() {
        let req = CreateLaneRequest {
            title: "Trip".to_string(),
            description: None,
            cover_image_url: Some("not a url".to_string()),
            tag_ids: vec![],
        };
        assert!(req.validate().is_err());

        let req = CreateLaneRequest {
            title: "Trip".to_string(),
            description: None,
            cover_image_url: Some("https://images.example/cover.jpg".to_string()),
            tag_ids: vec![],
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn update_with_no_fields_is_valid() {
        let req = UpdateLaneRequest {
            title: None,
            description: None,
            cover_image_url: None,
            tag_ids: None,
        };
        assert!(req.validate().is_ok());
    }
}
