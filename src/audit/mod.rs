//! Audit Log Module
//!
//! Fire-and-forget notification of mutating operations. Publishing failures
//! are reported to the caller of `publish` but never fail the originating
//! request.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deadpool_redis::Pool;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::trace_context::current_trace_id;

// == Audit Operation ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditOperation {
    Create,
    Delete,
    Update,
}

impl std::fmt::Display for AuditOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditOperation::Create => write!(f, "CREATE"),
            AuditOperation::Delete => write!(f, "DELETE"),
            AuditOperation::Update => write!(f, "UPDATE"),
        }
    }
}

// == Audit Event ==
/// One mutating operation, as published to the audit channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    pub operation: AuditOperation,
    pub owner_key: String,
    pub item_id: u64,
    pub timestamp: DateTime<Utc>,
    /// Trace id of the request that caused the event; `null` without a tracer
    pub trace_context: Option<String>,
}

impl AuditEvent {
    /// Builds an event stamped with the current time and trace id.
    pub fn new(operation: AuditOperation, owner_key: impl Into<String>, item_id: u64) -> Self {
        Self {
            operation,
            owner_key: owner_key.into(),
            item_id,
            timestamp: Utc::now(),
            trace_context: current_trace_id(),
        }
    }
}

// == Audit Error ==
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("audit channel unavailable: {0}")]
    Unavailable(String),

    #[error("failed to serialize audit event: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to publish audit event: {0}")]
    Publish(String),
}

// == Audit Publisher Trait ==
#[async_trait]
pub trait AuditPublisher: Send + Sync {
    async fn publish(&self, event: &AuditEvent) -> Result<(), AuditError>;
}

// == Redis Publisher ==
/// Publishes events as JSON to a Redis pub/sub channel.
#[derive(Clone)]
pub struct RedisAuditPublisher {
    pool: Pool,
    channel: String,
}

impl RedisAuditPublisher {
    pub fn new(pool: Pool, channel: impl Into<String>) -> Self {
        Self {
            pool,
            channel: channel.into(),
        }
    }
}

#[async_trait]
impl AuditPublisher for RedisAuditPublisher {
    async fn publish(&self, event: &AuditEvent) -> Result<(), AuditError> {
        let message = serde_json::to_string(event)?;

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AuditError::Unavailable(e.to_string()))?;

        conn.publish::<_, _, ()>(&self.channel, &message)
            .await
            .map_err(|e| AuditError::Publish(e.to_string()))?;

        debug!(
            channel = %self.channel,
            operation = %event.operation,
            owner_key = %event.owner_key,
            item_id = event.item_id,
            "published audit event"
        );
        Ok(())
    }
}

// == Logging Publisher ==
/// Writes events to the log. Used when no Redis channel is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingAuditPublisher;

#[async_trait]
impl AuditPublisher for LoggingAuditPublisher {
    async fn publish(&self, event: &AuditEvent) -> Result<(), AuditError> {
        let json = serde_json::to_string(event)?;
        info!(
            operation = %event.operation,
            owner_key = %event.owner_key,
            item_id = event.item_id,
            event = %json,
            "audit event"
        );
        Ok(())
    }
}
