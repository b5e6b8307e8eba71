use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;

use crate::error::ApiError;
use uuid::Uuid;

pub const DEFAULT_TAG_COLOR: &str = "#3B82F6";

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

/// Tag together with the number of lanes currently linked to it.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TagWithCount {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub lane_count: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTagRequest {
    pub name: String,
    pub color: Option<String>,
}

impl CreateTagRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = HashMap::new();
        if let Err(msg) = validate_tag_name(&self.name) {
            errors.insert("name".to_string(), msg);
        }
        if let Some(color) = &self.color {
            if let Err(msg) = validate_color(color) {
                errors.insert("color".to_string(), msg);
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
pub struct UpdateTagRequest {
    pub name: Option<String>,
    pub color: Option<String>,
}

impl UpdateTagRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = HashMap::new();
        if let Some(name) = &self.name {
            if let Err(msg) = validate_tag_name(name) {
                errors.insert("name".to_string(), msg);
            }
        }
        if let Some(color) = &self.color {
            if let Err(msg) = validate_color(color) {
                errors.insert("color".to_string(), msg);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_error("Validation failed", errors))
        }
    }
}

fn validate_tag_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Tag name is required".to_string());
    }
    if name.len() > 50 {
        return Err("Tag name must be less than 50 characters".to_string());
    }
    Ok(())
}

fn validate_color(color: &str) -> Result<(), String> {
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if valid {
        Ok(())
    } else {
        Err("Please enter a valid hex color".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_hex_colors() {
        assert!(validate_color("#3B82F6").is_ok());
        assert!(validate_color("#abcdef").is_ok());
    }

    #[test]
    fn invalid_hex_colors() {
        assert!(validate_color("3B82F6").is_err());
        assert!(validate_color("#3B82F").is_err());
        assert!(validate_color("#GGGGGG").is_err());
        assert!(validate_color("#3B82F6FF").is_err());
    }

    #[test]
    fn tag_name_bounds() {
        assert!(validate_tag_name("Travel").is_ok());
        assert!(validate_tag_name("").is_err());
        assert!(validate_tag_name(&"x".repeat(51)).is_err());
    }
}
