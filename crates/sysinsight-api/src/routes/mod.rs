pub mod health;
pub mod system;

use axum::Router;

use crate::AppState;

pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(system::routes(state.clone()))
        .merge(health::routes(state))
}
