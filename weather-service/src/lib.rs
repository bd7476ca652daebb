pub mod api_client;
pub mod cache;
pub mod config;
pub mod forecast;
pub mod handlers;
pub mod openapi;
pub mod service;
pub mod sweeper;
pub mod validator;

use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn router(state: handlers::AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/weather", get(handlers::lookup))
        .route("/api/weather/{location}", get(handlers::get_forecast))
        .merge(openapi::swagger_ui())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
