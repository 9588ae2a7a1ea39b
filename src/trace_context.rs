//! Trace Context Module
//!
//! Scoped "current trace id" accessor used when emitting audit events.
//! The id is carried in a tokio task-local set per request from the B3
//! `x-b3-traceid` header. Span creation and export are left to the
//! surrounding infrastructure.

use std::future::Future;

use axum::{extract::Request, middleware::Next, response::Response};

/// Header carrying the caller's trace id.
pub const TRACE_ID_HEADER: &str = "x-b3-traceid";

tokio::task_local! {
    static TRACE_ID: Option<String>;
}

/// Returns the trace id of the current request scope, if any.
///
/// Outside a scope, or when the request carried no id, this is `None`.
pub fn current_trace_id() -> Option<String> {
    TRACE_ID.try_with(|id| id.clone()).ok().flatten()
}

/// Runs `fut` with `trace_id` as the current trace id.
pub async fn scope<F: Future>(trace_id: Option<String>, fut: F) -> F::Output {
    TRACE_ID.scope(trace_id, fut).await
}

/// Axum middleware scoping the request's trace header for downstream handlers.
pub async fn propagate_trace_id(request: Request, next: Next) -> Response {
    let trace_id = request
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string);

    scope(trace_id, next.run(request)).await
}
