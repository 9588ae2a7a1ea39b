//! Response DTOs for the todo API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{StatsSnapshot, CACHE_PATTERN};

/// Cache section embedded in the health response.
#[derive(Debug, Clone, Serialize)]
pub struct CacheSummary {
    pub pattern: String,
    pub statistics: StatsSnapshot,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status, always "OK" while the process serves requests
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
    /// Service name
    pub service: String,
    pub cache: CacheSummary,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn ok(statistics: StatsSnapshot) -> Self {
        Self {
            status: "OK".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            service: "todos-api".to_string(),
            cache: CacheSummary {
                pattern: CACHE_PATTERN.to_string(),
                statistics,
            },
        }
    }
}

/// Response body for the cache statistics endpoint (GET /health/cache)
#[derive(Debug, Clone, Serialize)]
pub struct CacheHealthResponse {
    pub pattern: String,
    pub statistics: StatsSnapshot,
    /// "active" once any read was served, "idle" before that
    pub status: String,
}

impl CacheHealthResponse {
    pub fn new(statistics: StatsSnapshot) -> Self {
        let status = if statistics.total > 0 { "active" } else { "idle" };
        Self {
            pattern: CACHE_PATTERN.to_string(),
            statistics,
            status: status.to_string(),
        }
    }
}

/// Error response body for all error conditions
///
/// Carries a timestamp for correlation with server logs.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Short error class
    pub error: String,
    /// Human readable description
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheStats;

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::ok(CacheStats::new().snapshot());
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["status"], "OK");
        assert_eq!(json["service"], "todos-api");
        assert_eq!(json["cache"]["pattern"], "Cache-Aside");
        assert_eq!(json["cache"]["statistics"]["hitRatio"], 0.0);
    }

    #[test]
    fn test_cache_health_idle_then_active() {
        let stats = CacheStats::new();
        assert_eq!(CacheHealthResponse::new(stats.snapshot()).status, "idle");

        stats.record_miss();
        assert_eq!(CacheHealthResponse::new(stats.snapshot()).status, "active");
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Not found", "Todo not found");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("Not found"));
        assert!(json.contains("Todo not found"));
        assert!(json.contains("timestamp"));
    }
}
