//! API Handlers
//!
//! HTTP request handlers mapping the todo endpoints onto the access layer.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, warn};

use crate::access::{AccessSettings, CacheAsideLayer};
use crate::audit::{LoggingAuditPublisher, RedisAuditPublisher};
use crate::cache::{build_redis_pool, CacheStats, DisabledTier, InMemoryTier, RedisTier};
use crate::config::Config;
use crate::error::Result;
use crate::models::{
    parse_item_id, CacheHealthResponse, CreateTodoRequest, HealthResponse, Item,
};
use crate::source::StubSource;

use super::auth::AuthenticatedOwner;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Cache-aside access layer
    pub layer: Arc<CacheAsideLayer>,
}

impl AppState {
    /// Creates a new AppState around an already wired access layer.
    pub fn new(layer: CacheAsideLayer) -> Self {
        Self {
            layer: Arc::new(layer),
        }
    }

    /// Wires the access layer from configuration.
    ///
    /// With Redis enabled both the distributed tier and the audit channel use
    /// one pool. If the pool cannot be built the service runs local-tier-only
    /// and logs audit events instead of publishing them.
    pub fn from_config(config: &Config) -> Self {
        let source = Arc::new(StubSource::new(std::time::Duration::from_millis(
            config.source_latency_ms,
        )));
        let layer = CacheAsideLayer::new(AccessSettings::from(config), CacheStats::new(), source);

        let layer = if config.redis_enabled {
            match build_redis_pool(&config.redis_url(), config.tier_timeout()) {
                Ok(pool) => {
                    info!(
                        host = %config.redis_host,
                        port = config.redis_port,
                        "distributed tier: redis"
                    );
                    layer
                        .with_distributed(Arc::new(RedisTier::new(pool.clone())))
                        .with_audit(Arc::new(RedisAuditPublisher::new(
                            pool,
                            config.log_channel.clone(),
                        )))
                }
                Err(e) => {
                    warn!(error = %e, "failed to create Redis pool, running local tier only");
                    layer
                        .with_distributed(Arc::new(DisabledTier))
                        .with_audit(Arc::new(LoggingAuditPublisher))
                }
            }
        } else {
            info!("Redis disabled, distributed tier kept in process");
            layer.with_distributed(Arc::new(InMemoryTier::new()))
        };

        Self::new(layer)
    }
}

/// Handler for GET /todos
///
/// Lists the caller's todos.
pub async fn list_handler(
    State(state): State<AppState>,
    AuthenticatedOwner(owner): AuthenticatedOwner,
) -> Result<Json<Vec<Item>>> {
    let items = state.layer.list(&owner).await?;
    Ok(Json(items))
}

/// Handler for POST /todos
///
/// Creates a todo and returns it with 201 Created. Body rejections are
/// answered with the regular error body.
pub async fn create_handler(
    State(state): State<AppState>,
    AuthenticatedOwner(owner): AuthenticatedOwner,
    payload: std::result::Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Item>)> {
    let Json(req) = payload?;
    let content = req.validated_content()?;
    let item = state.layer.create(&owner, &content).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Handler for DELETE /todos/:task_id
///
/// Deletes a todo, answering 204 No Content.
pub async fn delete_handler(
    State(state): State<AppState>,
    AuthenticatedOwner(owner): AuthenticatedOwner,
    Path(task_id): Path<String>,
) -> Result<StatusCode> {
    let id = parse_item_id(&task_id)?;
    state.layer.delete(&owner, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /health
///
/// Liveness plus cache statistics. No authentication required.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::ok(state.layer.statistics()))
}

/// Handler for GET /health/cache
pub async fn cache_health_handler(State(state): State<AppState>) -> Json<CacheHealthResponse> {
    Json(CacheHealthResponse::new(state.layer.statistics()))
}
