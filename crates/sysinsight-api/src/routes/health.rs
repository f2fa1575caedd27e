use axum::{routing::get, Json, Router};
use sysinsight_types::HealthStatus;

use crate::AppState;

pub fn routes(_state: AppState) -> Router<AppState> {
    Router::new().route("/api/health", get(get_health))
}

/// Liveness only; never runs the collector.
async fn get_health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy".into(),
        timestamp: chrono::Local::now()
            .format("%Y-%m-%dT%H:%M:%S%.6f")
            .to_string(),
    })
}
