#![allow(non_snake_case)]

pub mod middleware;
pub mod routes;

use axum::Router;
use sysinsight_types::Snapshot;

/// Shared by every handler. The collector is injectable so the HTTP layer can
/// be exercised without touching the host.
#[derive(Clone)]
pub struct AppState {
    pub collector: fn() -> Snapshot,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            collector: sysinsight_providers::collect,
        }
    }
}

pub fn api_router(state: AppState) -> Router {
    let apiRoutes = routes::api_routes(state.clone());

    Router::new()
        .merge(apiRoutes)
        .layer(middleware::cors::dashboard_cors())
        .with_state(state)
}
