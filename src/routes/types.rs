use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Query parameters for the home page success banner
#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    pub success: Option<String>,
    #[serde(rename = "shortId")]
    pub short_id: Option<String>,
}

/// Query parameters for GET /api/urls.
///
/// Kept as raw strings so that non-numeric values fall back to defaults
/// instead of rejecting the request.
#[derive(Debug, Deserialize)]
pub struct ListUrlsQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Response for GET /health
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    /// Seconds since process start
    pub uptime: f64,
    pub database: String,
    pub version: String,
}
