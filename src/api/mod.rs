//! API Module
//!
//! HTTP handlers and routing for the todo REST API.
//!
//! # Endpoints
//! - `GET /todos` - List the caller's todos
//! - `POST /todos` - Create a todo
//! - `DELETE /todos/:task_id` - Delete a todo
//! - `GET /health` - Health check endpoint
//! - `GET /health/cache` - Cache statistics

pub mod auth;
pub mod handlers;
pub mod routes;

pub use auth::{AuthenticatedOwner, OWNER_HEADER};
pub use handlers::*;
pub use routes::create_router;
