use crate::api::{handlers, AppState};
use crate::config::ServerConfig;
use axum::{
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

/// Build the main API router with default server limits
pub fn build_router(state: AppState) -> Router {
    build_router_with(state, &ServerConfig::default())
}

/// Build the main API router
pub fn build_router_with(state: AppState, server: &ServerConfig) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(handlers::health_check))
        .route("/health/live", get(handlers::health_check))
        .route("/health/ready", get(handlers::health_check))
        // Metrics
        .route("/metrics", get(handlers::metrics))
        // Analysis
        .route("/analyze", post(handlers::analyze))
        // Add state
        .with_state(state)
        // Add middleware
        .layer(RequestBodyLimitLayer::new(server.max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(server.request_timeout_secs)))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(false))
                .on_response(DefaultOnResponse::new().include_headers(false)),
        )
        .layer(CorsLayer::permissive())
}
