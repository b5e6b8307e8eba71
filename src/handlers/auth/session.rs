use serde::Serialize;
use serde_json::Value;

use crate::database::models::PublicUser;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Serialize)]
pub struct MePayload {
    pub user: PublicUser,
}

/// GET /auth/me - Current authenticated user
pub async fn me(AuthUser(user): AuthUser) -> ApiResult<MePayload> {
    Ok(ApiResponse::success(MePayload { user: user.into() }))
}

/// POST /auth/logout - Always succeeds. The session model is a single
/// bearer token the client discards; the server holds no session state and
/// never blacklists issued tokens.
pub async fn logout() -> ApiResult<Value> {
    Ok(ApiResponse::success(Value::Null).message("Logged out successfully"))
}
