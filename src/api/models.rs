//! Wire types for the Aquaview backend.
//!
//! Field names mirror the backend contract exactly; timestamps arrive as
//! timezone-naive ISO-8601 strings and are kept naive rather than guessed
//! into an offset.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ── Authentication ───────────────────────────────────────────────

/// Login request body.
#[derive(Debug, Clone, Serialize)]
pub struct UserLogin {
    /// Username or email.
    pub username: String,
    pub password: String,
}

/// Successful login / refresh response.
#[derive(Debug, Clone, Deserialize)]
pub struct Token {
    /// Opaque signed access token.
    pub access_token: String,
    /// Always `bearer`.
    pub token_type: String,
    /// Lifetime in seconds.
    pub expires_in: i64,
    /// Profile of the user the token was issued to.
    pub user: UserProfile,
}

/// The authenticated user's profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub is_admin: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub last_login: Option<NaiveDateTime>,
}

// ── Water-quality records ────────────────────────────────────────

/// A stored water-quality record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterQualityRecord {
    pub id: i64,
    pub sampling_date: NaiveDateTime,
    pub sampling_time: Option<String>,
    pub detection_date: NaiveDateTime,
    pub code: Option<String>,
    pub river_name: String,
    pub method: Option<String>,

    pub cod_value: Option<f64>,
    pub ammonia_nitrogen_value: Option<f64>,
    pub total_phosphorus_value: Option<f64>,
    pub potassium_permanganate_value: Option<f64>,

    pub cod_level: Option<String>,
    pub ammonia_nitrogen_level: Option<String>,
    pub total_phosphorus_level: Option<String>,
    pub potassium_permanganate_level: Option<String>,

    pub comprehensive_quality_level: Option<String>,
    pub comprehensive_level_number: Option<i32>,
    pub remarks: Option<String>,

    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Body for creating a record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaterQualityDraft {
    pub sampling_date: Option<NaiveDateTime>,
    pub sampling_time: Option<String>,
    pub detection_date: Option<NaiveDateTime>,
    pub code: Option<String>,
    pub river_name: Option<String>,
    pub method: Option<String>,
    pub cod_value: Option<f64>,
    pub ammonia_nitrogen_value: Option<f64>,
    pub total_phosphorus_value: Option<f64>,
    pub potassium_permanganate_value: Option<f64>,
    pub cod_level: Option<String>,
    pub ammonia_nitrogen_level: Option<String>,
    pub total_phosphorus_level: Option<String>,
    pub potassium_permanganate_level: Option<String>,
    pub comprehensive_quality_level: Option<String>,
    pub comprehensive_level_number: Option<i32>,
    pub remarks: Option<String>,
}

/// Body for partially updating a record. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaterQualityPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sampling_date: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sampling_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detection_date: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub river_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cod_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ammonia_nitrogen_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_phosphorus_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub potassium_permanganate_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cod_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ammonia_nitrogen_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_phosphorus_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub potassium_permanganate_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comprehensive_quality_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comprehensive_level_number: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

/// Paged record listing.
#[derive(Debug, Clone, Deserialize)]
pub struct WaterQualityPage {
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
    pub items: Vec<WaterQualityRecord>,
}

/// Query parameters for the record listing.
#[derive(Debug, Clone, Serialize)]
pub struct RecordQuery {
    pub page: u32,
    pub per_page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub river_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sampling_date_start: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sampling_date_end: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comprehensive_quality_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Default for RecordQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
            river_name: None,
            sampling_date_start: None,
            sampling_date_end: None,
            comprehensive_quality_level: None,
            code: None,
        }
    }
}

// ── Dashboard ────────────────────────────────────────────────────

/// Overview counters for the public dashboard.
#[derive(Debug, Clone, Deserialize)]
pub struct OverviewStatistics {
    pub total_records: i64,
    pub excellent_count: i64,
    pub good_count: i64,
    pub poor_count: i64,
    pub very_poor_count: i64,
    pub polluted_count: i64,
    pub excellent_rate: f64,
    pub latest_update: NaiveDateTime,
}

/// Per-river aggregate.
#[derive(Debug, Clone, Deserialize)]
pub struct RiverStatistics {
    pub river_name: String,
    pub total_count: i64,
    pub excellent_count: i64,
    pub good_count: i64,
    pub poor_count: i64,
    pub very_poor_count: i64,
    pub polluted_count: i64,
    pub excellent_rate: f64,
    pub latest_sampling_date: Option<NaiveDateTime>,
}

/// One slice of the quality-level distribution.
#[derive(Debug, Clone, Deserialize)]
pub struct QualityLevelSlice {
    pub level: String,
    pub count: i64,
    pub percentage: f64,
}

/// One month of the trend series.
#[derive(Debug, Clone, Deserialize)]
pub struct MonthlyTrend {
    pub month: String,
    pub total_count: i64,
    pub excellent_count: i64,
    pub excellent_rate: f64,
}

/// Aggregate statistics for a single indicator.
#[derive(Debug, Clone, Deserialize)]
pub struct IndicatorStatistics {
    pub indicator_name: String,
    pub avg_value: Option<f64>,
    pub max_value: Option<f64>,
    pub min_value: Option<f64>,
    pub unit: String,
    pub standard_value: Option<f64>,
    pub exceed_rate: f64,
}

/// Condensed record as shown in the dashboard ticker.
#[derive(Debug, Clone, Deserialize)]
pub struct RecentRecord {
    pub id: i64,
    pub river_name: String,
    pub sampling_date: NaiveDateTime,
    pub comprehensive_quality_level: String,
    pub cod_value: Option<f64>,
    pub ammonia_nitrogen_value: Option<f64>,
    pub total_phosphorus_value: Option<f64>,
    pub potassium_permanganate_value: Option<f64>,
}

/// Record flagged as polluted, with its warning tier.
#[derive(Debug, Clone, Deserialize)]
pub struct WarningRecord {
    pub id: i64,
    pub river_name: String,
    pub sampling_date: NaiveDateTime,
    pub comprehensive_quality_level: String,
    pub cod_value: Option<f64>,
    pub ammonia_nitrogen_value: Option<f64>,
    pub total_phosphorus_value: Option<f64>,
    pub potassium_permanganate_value: Option<f64>,
    pub warning_level: String,
}

/// Everything the public dashboard needs in one response.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardSnapshot {
    pub overview: OverviewStatistics,
    pub river_stats: Vec<RiverStatistics>,
    pub quality_distribution: Vec<QualityLevelSlice>,
    pub monthly_trend: Vec<MonthlyTrend>,
    pub indicator_stats: Vec<IndicatorStatistics>,
    pub recent_data: Vec<RecentRecord>,
    pub warning_data: Vec<WarningRecord>,
}

/// Sampling-method listing.
#[derive(Debug, Clone, Deserialize)]
pub struct MethodList {
    pub methods: Vec<String>,
    pub total_count: i64,
}
