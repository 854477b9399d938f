use crate::api::session;
use crate::{AppState, health, middleware::authenticate};

use axum::{Router, middleware, routing::get};
use tower_http::cors::{Any, CorsLayer};

/// Build the application router with all endpoints
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Authenticated endpoints
        .route("/session", get(session::session))
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate))
        // Health check stays reachable without credentials
        .route("/health", get(health::health_check))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
