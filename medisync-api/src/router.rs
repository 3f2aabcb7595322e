use crate::handlers;
use crate::state::AppState;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// `/health`, the hospital registry under `/api/hospitals`, and the web
/// manifest plus cache rules for the service worker. Anything else is a
/// JSON 404.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/api/hospitals",
            get(handlers::list_hospitals).post(handlers::register_hospital),
        )
        .route("/manifest.webmanifest", get(handlers::manifest))
        .route("/cache-rules.json", get(handlers::cache_rules))
        .fallback(handlers::not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
