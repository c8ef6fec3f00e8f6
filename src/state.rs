use crate::db::Repository;
use std::time::Instant;

/// Application state shared across all HTTP handlers.
///
/// Wrapped in `Arc` and handed to every handler via Axum's State
/// extraction; the repository is the only shared connection state.
#[derive(Clone)]
pub struct AppState {
    /// Database repository for URL records
    pub repository: Repository,

    /// Base URL for constructing short URLs (e.g., "http://localhost:5000")
    pub base_url: String,

    /// Length of generated short ids
    pub short_id_length: usize,

    /// Maximum number of attempts to allocate a unique short id
    pub short_id_max_attempts: u32,

    /// Number of recent URLs shown on the home page
    pub recent_limit: i64,

    /// Default page size for the listing endpoint
    pub default_page_size: i64,

    /// Page size ceiling for the listing endpoint
    pub max_page_size: i64,

    /// Process start time, for the health endpoint's uptime field
    pub started_at: Instant,
}
