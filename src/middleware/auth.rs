use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::validate_jwt;
use crate::database::models::User;
use crate::database::DatabaseManager;
use crate::error::ApiError;

/// Extractor for endpoints that require authentication. Bearer token ->
/// claims -> user row; any failure at any step is a 401. The token never
/// tells the client which step failed.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(parts)
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

        let claims = validate_jwt(&token)
            .map_err(|_| ApiError::unauthorized("Invalid or expired token"))?;

        let pool = DatabaseManager::pool().await?;
        let user = find_user(&pool, claims.sub)
            .await?
            .ok_or_else(|| ApiError::unauthorized("Invalid or expired token"))?;

        Ok(AuthUser(user))
    }
}

/// Optional-auth extractor for public read endpoints: resolves the caller
/// when a valid token is present and collapses every failure to `None`.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match AuthUser::from_request_parts(parts, state).await {
            Ok(AuthUser(user)) => Ok(MaybeUser(Some(user))),
            Err(_) => Ok(MaybeUser(None)),
        }
    }
}

fn extract_bearer_token(parts: &Parts) -> Option<String> {
    let auth_header = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = auth_header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

async fn find_user(pool: &PgPool, id: Uuid) -> Result<Option<User>, ApiError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}
