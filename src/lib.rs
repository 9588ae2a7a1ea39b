//! Todos Cache - per-user todo service behind a two-tier cache
//!
//! Reads go local tier → distributed tier → source of record; writes go to
//! the source first and then refresh both tiers.

pub mod access;
pub mod api;
pub mod audit;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod source;
pub mod tasks;
pub mod trace_context;

pub use access::{AccessSettings, CacheAsideLayer};
pub use api::AppState;
pub use config::Config;
pub use error::ServiceError;
pub use tasks::spawn_cleanup_task;
