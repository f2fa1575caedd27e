use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use sysinsight_types::ErrorBody;
use tracing::error;

use crate::AppState;

pub fn routes(_state: AppState) -> Router<AppState> {
    Router::new().route("/api/system", get(get_system_snapshot))
}

/// The collector blocks for the CPU sample window, so it runs on the blocking
/// pool. A panic inside it becomes a 500 rather than a dropped connection.
async fn get_system_snapshot(State(state): State<AppState>) -> Response {
    let collector = state.collector;
    match tokio::task::spawn_blocking(collector).await {
        // A snapshot that failed during setup is still data: 200 with `{"error"}`.
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(e) => {
            error!("system collector did not complete: {e}");
            let body = ErrorBody::new(panic_message(e));
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

fn panic_message(e: tokio::task::JoinError) -> String {
    if !e.is_panic() {
        return e.to_string();
    }
    let payload = e.into_panic();
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "system collector panicked".into()
    }
}
