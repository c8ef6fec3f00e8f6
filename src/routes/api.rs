use crate::error::{AppError, AppResult};
use crate::models::{Pagination, StatsResponse, UrlListResponse};
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Json};
use std::sync::Arc;

use super::types::ListUrlsQuery;
use super::AppState;

/// GET /api/stats/{shortId} - JSON statistics for one record
pub async fn stats(
    State(state): State<Arc<AppState>>,
    Path(short_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let record = state
        .repository
        .find_active_by_short_id(&short_id)
        .await?
        .ok_or(AppError::NotFound(short_id))?;

    Ok(Json(StatsResponse::from(record)))
}

/// GET /api/urls?page&limit - paginated listing of active records,
/// most recent first
pub async fn list_urls(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListUrlsQuery>,
) -> AppResult<impl IntoResponse> {
    // Non-numeric values fall back to defaults rather than erroring
    let page = query
        .page
        .as_deref()
        .and_then(|p| p.parse::<i64>().ok())
        .unwrap_or(1)
        .max(1);
    let limit = query
        .limit
        .as_deref()
        .and_then(|l| l.parse::<i64>().ok())
        .unwrap_or(state.default_page_size)
        .clamp(1, state.max_page_size);
    let offset = (page - 1) * limit;

    let urls = state.repository.list_active(limit, offset).await?;
    let total = state.repository.count_active().await?;

    Ok(Json(UrlListResponse {
        urls,
        pagination: Pagination::new(page, limit, total),
    }))
}
