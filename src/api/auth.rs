//! Authentication endpoints.

use crate::api::error::ApiError;
use crate::api::models::{Token, UserLogin, UserProfile};
use crate::api::transport::Transport;

/// `POST /api/v1/auth/login` — exchange credentials for a token.
pub async fn login(
    transport: &Transport,
    username: &str,
    password: &str,
) -> Result<Token, ApiError> {
    let body = UserLogin {
        username: username.to_string(),
        password: password.to_string(),
    };
    transport.post("/api/v1/auth/login", &body).await
}

/// `POST /api/v1/auth/logout` — revoke the current token server-side.
pub async fn logout(transport: &Transport) -> Result<(), ApiError> {
    let _ack: serde_json::Value = transport.post_empty("/api/v1/auth/logout").await?;
    Ok(())
}

/// `GET /api/v1/auth/me` — profile of the token's owner.
pub async fn me(transport: &Transport) -> Result<UserProfile, ApiError> {
    transport.get("/api/v1/auth/me").await
}

/// `POST /api/v1/auth/refresh` — mint a fresh token for the current user.
/// Part of the backend contract; nothing in the session flow calls it yet.
pub async fn refresh(transport: &Transport) -> Result<Token, ApiError> {
    transport.post_empty("/api/v1/auth/refresh").await
}
