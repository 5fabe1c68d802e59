//! Store health endpoint

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use super::AppState;
use crate::utils::errors::Result;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub users: i64,
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>> {
    state.db.health_check().await?;
    let stats = state.db.stats().await?;

    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        users: stats.users,
    }))
}
