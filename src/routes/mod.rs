pub mod encomendas;
pub mod usuarios;

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(encomendas::routes(state.clone()))
        .merge(usuarios::routes(state))
}

/// Full application: API under `/api`, health check, CORS and request tracing.
pub fn app(state: AppState) -> Router {
    let api = create_router(state.clone())
        .route("/", get(|| async { "Encomendas API" }));

    Router::new()
        .nest("/api", api)
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
