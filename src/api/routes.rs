//! API Routes
//!
//! Configures the Axum router with all todo service endpoints.

use axum::{
    middleware,
    routing::{delete, get},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_health_handler, create_handler, delete_handler, health_handler, list_handler, AppState,
};
use crate::trace_context::propagate_trace_id;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /todos` - List the caller's todos
/// - `POST /todos` - Create a todo
/// - `DELETE /todos/:task_id` - Delete a todo
/// - `GET /health` - Health check with cache statistics (no auth)
/// - `GET /health/cache` - Cache statistics (no auth)
///
/// # Middleware
/// - Trace id: scopes the `x-b3-traceid` header for audit events
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/todos", get(list_handler).post(create_handler))
        .route("/todos/:task_id", delete(delete_handler))
        .route("/health", get(health_handler))
        .route("/health/cache", get(cache_health_handler))
        .layer(middleware::from_fn(propagate_trace_id))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
