use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// URL record in the database.
///
/// Serialized with camelCase field names, which is the wire format used by
/// the JSON API and the listing endpoint.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlRecord {
    pub id: i64,
    pub short_id: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    pub clicks: i64,
    pub last_clicked: Option<DateTime<Utc>>,
    pub is_active: bool,
}

/// Form body for POST /shorten
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenForm {
    #[serde(rename = "originalUrl", default)]
    #[validate(length(min = 1, message = "Please provide a URL to shorten"))]
    pub original_url: String,
}

/// Response for GET /api/stats/{shortId}
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub short_id: String,
    pub original_url: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
    pub last_clicked: Option<DateTime<Utc>>,
}

impl From<UrlRecord> for StatsResponse {
    fn from(record: UrlRecord) -> Self {
        StatsResponse {
            short_id: record.short_id,
            original_url: record.original_url,
            clicks: record.clicks,
            created_at: record.created_at,
            last_clicked: record.last_clicked,
        }
    }
}

/// Pagination metadata for the listing endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_urls: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(current_page: i64, limit: i64, total_urls: i64) -> Self {
        let total_pages = if total_urls == 0 {
            0
        } else {
            (total_urls + limit - 1) / limit
        };

        Pagination {
            current_page,
            total_pages,
            total_urls,
            has_next: current_page < total_pages,
            has_prev: current_page > 1,
        }
    }
}

/// Response for GET /api/urls
#[derive(Debug, Serialize)]
pub struct UrlListResponse {
    pub urls: Vec<UrlRecord>,
    pub pagination: Pagination,
}
