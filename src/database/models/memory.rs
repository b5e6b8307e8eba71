use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;
use uuid::Uuid;

use super::image::MemoryImage;
use crate::error::ApiError;

/// A dated event within a lane. `occurred_at` is the user-facing date and is
/// distinct from `created_at`; `sort_index` supports manual ordering and is
/// gap-tolerant (deletes never renumber siblings).
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Memory {
    pub id: Uuid,
    pub lane_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub sort_index: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemoryWithImages {
    #[serde(flatten)]
    pub memory: Memory,
    pub images: Vec<MemoryImage>,
}

/// Trimmed memory shape embedded in lane list responses.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MemoryPreview {
    #[serde(skip_serializing)]
    pub lane_id: Uuid,
    pub id: Uuid,
    pub title: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMemoryRequest {
    pub title: String,
    pub description: Option<String>,
    pub occurred_at: String,
    #[serde(default)]
    pub images: Vec<String>,
}

impl CreateMemoryRequest {
    pub fn validate(&self) -> Result<DateTime<Utc>, ApiError> {
        let mut errors = HashMap::new();

        if let Err(msg) = validate_title(&self.title) {
            errors.insert("title".to_string(), msg);
        }
        if let Err(msg) = validate_description(self.description.as_deref()) {
            errors.insert("description".to_string(), msg);
        }

        let occurred_at = match parse_occurred_at(&self.occurred_at) {
            Ok(dt) => Some(dt),
            Err(msg) => {
                errors.insert("occurredAt".to_string(), msg);
                None
            }
        };

        match occurred_at {
            Some(dt) if errors.is_empty() => Ok(dt),
            _ => Err(ApiError::validation_error("Validation failed", errors)),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemoryRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub occurred_at: Option<String>,
    pub images: Option<Vec<String>>,
}

impl UpdateMemoryRequest {
    pub fn validate(&self) -> Result<Option<DateTime<Utc>>, ApiError> {
        let mut errors = HashMap::new();

        if let Some(title) = &self.title {
            if let Err(msg) = validate_title(title) {
                errors.insert("title".to_string(), msg);
            }
        }
        if let Err(msg) = validate_description(self.description.as_deref()) {
            errors.insert("description".to_string(), msg);
        }

        let occurred_at = match &self.occurred_at {
            Some(raw) => match parse_occurred_at(raw) {
                Ok(dt) => Some(dt),
                Err(msg) => {
                    errors.insert("occurredAt".to_string(), msg);
                    None
                }
            },
            None => None,
        };

        if errors.is_empty() {
            Ok(occurred_at)
        } else {
            Err(ApiError::validation_error("Validation failed", errors))
        }
    }
}

pub fn validate_title(title: &str) -> Result<(), String> {
    if title.is_empty() {
        return Err("Title is required".to_string());
    }
    if title.len() > 200 {
        return Err("Title must be less than 200 characters".to_string());
    }
    Ok(())
}

pub fn validate_description(description: Option<&str>) -> Result<(), String> {
    if let Some(desc) = description {
        if desc.len() > 1000 {
            return Err("Description must be less than 1000 characters".to_string());
        }
    }
    Ok(())
}

fn parse_occurred_at(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| "Please enter a valid date".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_parses_rfc3339_dates() {
        let req = CreateMemoryRequest {
            title: "First day".to_string(),
            description: None,
            occurred_at: "2024-06-01T12:00:00Z".to_string(),
            images: vec![],
        };
        let dt = req.validate().expect("valid");
        assert_eq!(dt.timestamp(), 1717243200);
    }

    #[test]
    fn create_request_rejects_bad_date() {
        let req = CreateMemoryRequest {
            title: "First day".to_string(),
            description: None,
            occurred_at: "yesterday".to_string(),
            images: vec![],
        };
        match req.validate() {
            Err(ApiError::ValidationError { field_errors, .. }) => {
                assert!(field_errors.contains_key("occurredAt"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn update_request_allows_all_fields_absent() {
        let req = UpdateMemoryRequest {
            title: None,
            description: None,
            occurred_at: None,
            images: None,
        };
        assert!(req.validate().expect("valid").is_none());
    }

    #[test]
    fn title_length_bounds() {
        assert!(validate_title(&"x".repeat(200)).is_ok());
        assert!(validate_title(&"x".repeat(201)).is_err());
        assert!(validate_title("").is_err());
    }
}
