//! Route definitions for the chart API.

pub mod calculate;
pub mod health;
pub mod pages;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Build the full application router. Cross-origin access is unrestricted.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/calculate", post(calculate::calculate))
        .route("/calculate_direct", post(calculate::calculate_direct))
        .route("/health", get(health::health));

    Router::new()
        .route("/", get(pages::index))
        .route("/test", get(pages::test_page))
        .nest("/api", api_routes)
        .nest_service("/static", ServeDir::new(&state.config.static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
