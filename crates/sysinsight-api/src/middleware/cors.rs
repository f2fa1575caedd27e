use http::{header, Method};
use tower_http::cors::{Any, CorsLayer};

/// The dashboard is served from a different origin than the API. This is not
/// an access control boundary.
pub fn dashboard_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}
