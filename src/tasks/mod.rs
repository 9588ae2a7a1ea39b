//! Background Tasks Module
//!
//! # Tasks
//! - Local tier sweep: removes expired entries at configured intervals

mod cleanup;

pub use cleanup::{spawn_cleanup_task, spawn_cleanup_task_every};
