//! Public dashboard endpoints. None of these require a credential.

use crate::api::error::ApiError;
use crate::api::models::{DashboardSnapshot, MethodList};
use crate::api::transport::Transport;

/// `GET /api/v1/dashboard/all` — everything the main screen needs at once.
pub async fn all(transport: &Transport) -> Result<DashboardSnapshot, ApiError> {
    transport.get("/api/v1/dashboard/all").await
}

/// `GET /api/v1/dashboard/method-list` — sampling methods with data.
pub async fn method_list(transport: &Transport) -> Result<MethodList, ApiError> {
    transport.get("/api/v1/dashboard/method-list").await
}

/// `GET /api/v1/dashboard/method/{method}/all` — per-method screen data.
/// The per-method payload mirrors the main snapshot with method-tagged
/// rows, so it is rendered from the raw value.
pub async fn method_all(
    transport: &Transport,
    method: &str,
) -> Result<serde_json::Value, ApiError> {
    transport
        .get(&format!("/api/v1/dashboard/method/{method}/all"))
        .await
}
