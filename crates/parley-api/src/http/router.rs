//! Axum router configuration with middleware.
//!
//! API routes are under `/api/`, plus `GET /health`.
//! Middleware: request body limit, CORS, tracing.
//!
//! When the configured web directory exists it is served as the fallback
//! for every path the API does not claim. Otherwise only the API is served.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = state.settings.body_limit_bytes;
    let web_dir = state.settings.web_dir.clone();

    let api_routes = Router::new()
        // Client settings
        .route(
            "/config",
            get(handlers::config::get_config).post(handlers::config::put_config),
        )
        // Sessions
        .route(
            "/sessions",
            get(handlers::session::list_sessions).post(handlers::session::create_session),
        )
        .route("/sessions/{id}", put(handlers::session::rename_session))
        .route(
            "/sessions/{id}/messages",
            get(handlers::session::get_messages).post(handlers::session::replace_messages),
        )
        // Legacy flat log
        .route(
            "/messages",
            get(handlers::legacy::get_legacy_messages)
                .post(handlers::legacy::replace_legacy_messages),
        )
        // Relay
        .route("/debug", post(handlers::relay::debug_config))
        .route("/test", post(handlers::relay::test_connection))
        .route("/chat", post(handlers::relay::chat));

    let mut router = Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if web_dir.is_dir() {
        router = router.fallback_service(ServeDir::new(&web_dir));
        tracing::info!(path = %web_dir.display(), "Static web UI serving enabled");
    }

    router
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
