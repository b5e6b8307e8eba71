use axum::Json;

use super::AuthPayload;
use crate::auth::{generate_jwt, verify_password, Claims};
use crate::database::models::user::LoginRequest;
use crate::database::models::User;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// POST /auth/login - Authenticate with email and password, issue a token.
/// Unknown email and wrong password produce the same response.
pub async fn login(Json(payload): Json<LoginRequest>) -> ApiResult<AuthPayload> {
    payload.validate()?;

    let pool = DatabaseManager::pool().await?;

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(&payload.email)
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

    let valid = verify_password(&payload.password, &user.password_hash).map_err(|e| {
        tracing::error!("Password verification failed: {}", e);
        ApiError::internal_server_error("An error occurred while processing your request")
    })?;
    if !valid {
        return Err(ApiError::unauthorized("Invalid email or password"));
    }

    let token = generate_jwt(&Claims::new(user.id)).map_err(|e| {
        tracing::error!("Token generation failed: {}", e);
        ApiError::internal_server_error("An error occurred while processing your request")
    })?;

    Ok(ApiResponse::success(AuthPayload { user: user.into(), token }).message("Login successful"))
}
