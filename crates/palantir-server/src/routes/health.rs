use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Degraded,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub service: String,
    pub version: &'static str,
}

/// `GET /health`: 200 while DuckDB answers `SELECT 1`, 503 once it stops.
#[tracing::instrument(skip(state))]
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let (code, status) = match state.db.ping().await {
        Ok(()) => (StatusCode::OK, HealthStatus::Ok),
        Err(e) => {
            tracing::error!(error = %e, "DuckDB ping failed");
            (StatusCode::SERVICE_UNAVAILABLE, HealthStatus::Degraded)
        }
    };

    (
        code,
        Json(HealthResponse {
            status,
            service: state.config.service_name.clone(),
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}
