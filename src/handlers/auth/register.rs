use axum::Json;

use super::AuthPayload;
use crate::auth::{generate_jwt, hash_password, Claims};
use crate::database::models::user::RegisterRequest;
use crate::database::models::User;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// POST /auth/register - Create a user account and issue a bearer token
pub async fn register(Json(payload): Json<RegisterRequest>) -> ApiResult<AuthPayload> {
    payload.validate()?;

    let pool = DatabaseManager::pool().await?;

    let existing: Option<i32> = sqlx::query_scalar("SELECT 1 FROM users WHERE email = $1")
        .bind(&payload.email)
        .fetch_optional(&pool)
        .await?;
    if existing.is_some() {
        return Err(ApiError::conflict("User with this email already exists"));
    }

    let password_hash = hash_password(&payload.password).map_err(|e| {
        tracing::error!("Password hashing failed: {}", e);
        ApiError::internal_server_error("An error occurred while processing your request")
    })?;

    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (id, email, password_hash, name)
         VALUES ($1, $2, $3, $4)
         RETURNING *",
    )
    .bind(uuid::Uuid::new_v4())
    .bind(&payload.email)
    .bind(&password_hash)
    .bind(&payload.name)
    .fetch_one(&pool)
    .await?;

    let token = generate_jwt(&Claims::new(user.id)).map_err(|e| {
        tracing::error!("Token generation failed: {}", e);
        ApiError::internal_server_error("An error occurred while processing your request")
    })?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok(ApiResponse::created(AuthPayload { user: user.into(), token })
        .message("User registered successfully"))
}
