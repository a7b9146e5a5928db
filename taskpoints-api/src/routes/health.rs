/// Health endpoint
///
/// `GET /health` is unauthenticated, like registration and login. It
/// reports whether the process is up and whether the database answers; a
/// dead database degrades the status but still returns 200, so a probe
/// can tell "unhealthy dependency" from "dead process".

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

/// Body of the health response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `healthy` or `degraded`
    pub status: String,

    /// Crate version baked in at compile time
    pub version: String,

    /// `connected` or `disconnected`
    pub database: String,
}

/// Reports liveness and database reachability
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let database = match sqlx::query("SELECT 1").fetch_one(&state.db).await {
        Ok(_) => "connected",
        Err(e) => {
            tracing::warn!("health probe could not reach database: {e}");
            "disconnected"
        }
    };

    let status = if database == "connected" {
        "healthy"
    } else {
        "degraded"
    };

    Ok(Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
    }))
}
