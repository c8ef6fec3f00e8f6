use crate::routes::types::HealthResponse;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use std::sync::Arc;
use std::time::Duration;

use super::AppState;

/// GET /health - liveness/readiness probe
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let database = match tokio::time::timeout(Duration::from_secs(5), state.repository.ping()).await
    {
        Ok(Ok(())) => "Connected",
        Ok(Err(_)) | Err(_) => "Disconnected",
    };

    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: chrono::Utc::now(),
        uptime: state.started_at.elapsed().as_secs_f64(),
        database: database.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
