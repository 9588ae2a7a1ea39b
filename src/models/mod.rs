//! Domain records and request/response models for the todo API
//!
//! `todo` holds the typed `Item`/`Collection` records cached by the access
//! layer; `requests` and `responses` are the HTTP DTOs.

pub mod requests;
pub mod responses;
pub mod todo;

// Re-export commonly used types
pub use requests::{parse_item_id, validate_content, CreateTodoRequest};
pub use responses::{CacheHealthResponse, CacheSummary, ErrorResponse, HealthResponse};
pub use todo::{Collection, Item};
