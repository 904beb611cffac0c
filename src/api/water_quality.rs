//! Water-quality record endpoints (admin CRUD plus option lists).

use crate::api::error::ApiError;
use crate::api::models::{
    RecordQuery, WaterQualityDraft, WaterQualityPage, WaterQualityPatch, WaterQualityRecord,
};
use crate::api::transport::Transport;

/// `GET /api/v1/water-quality/` — paged, filterable listing.
pub async fn list(
    transport: &Transport,
    query: &RecordQuery,
) -> Result<WaterQualityPage, ApiError> {
    transport.get_with("/api/v1/water-quality/", query).await
}

/// `POST /api/v1/water-quality/` — create a record.
pub async fn create(
    transport: &Transport,
    draft: &WaterQualityDraft,
) -> Result<WaterQualityRecord, ApiError> {
    transport.post("/api/v1/water-quality/", draft).await
}

/// `GET /api/v1/water-quality/{id}` — fetch one record.
pub async fn get(transport: &Transport, id: i64) -> Result<WaterQualityRecord, ApiError> {
    transport.get(&format!("/api/v1/water-quality/{id}")).await
}

/// `PUT /api/v1/water-quality/{id}` — partial update.
pub async fn update(
    transport: &Transport,
    id: i64,
    patch: &WaterQualityPatch,
) -> Result<WaterQualityRecord, ApiError> {
    transport
        .put(&format!("/api/v1/water-quality/{id}"), patch)
        .await
}

/// `DELETE /api/v1/water-quality/{id}`.
pub async fn delete(transport: &Transport, id: i64) -> Result<(), ApiError> {
    transport
        .delete(&format!("/api/v1/water-quality/{id}"))
        .await
}

/// `GET /api/v1/water-quality/options/quality-levels` — valid level labels.
pub async fn quality_levels(transport: &Transport) -> Result<Vec<String>, ApiError> {
    transport
        .get("/api/v1/water-quality/options/quality-levels")
        .await
}

/// `GET /api/v1/water-quality/options/rivers` — known river names.
pub async fn rivers(transport: &Transport) -> Result<Vec<String>, ApiError> {
    transport.get("/api/v1/water-quality/options/rivers").await
}

/// `GET /api/v1/water-quality/statistics/overview` — admin-side aggregate.
/// The shape is backend-defined and rendered as-is.
pub async fn statistics_overview(
    transport: &Transport,
) -> Result<serde_json::Value, ApiError> {
    transport
        .get("/api/v1/water-quality/statistics/overview")
        .await
}
