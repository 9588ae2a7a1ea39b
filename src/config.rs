//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// TTL in milliseconds applied to both cache tiers
    pub cache_ttl_ms: u64,
    /// Prefix prepended to the owner key to build cache keys
    pub cache_prefix: String,
    /// Local tier sweep interval in seconds
    pub cleanup_interval: u64,
    /// Whether the distributed tier (Redis) is used at all
    pub redis_enabled: bool,
    /// Redis host name
    pub redis_host: String,
    /// Redis port
    pub redis_port: u16,
    /// Optional Redis password
    pub redis_password: Option<String>,
    /// Connect to Redis over TLS
    pub redis_tls: bool,
    /// Pub/sub channel receiving audit events
    pub log_channel: String,
    /// Deadline for a single distributed tier call, in milliseconds
    pub tier_timeout_ms: u64,
    /// Deadline for a single source-of-record call, in milliseconds
    pub source_timeout_ms: u64,
    /// Simulated latency of the stub source of record, in milliseconds
    pub source_latency_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `TODO_API_PORT` - HTTP server port (default: 8082)
    /// - `CACHE_TTL_MS` - Cache TTL in milliseconds (default: 300000)
    /// - `CACHE_PREFIX` - Cache key prefix (default: "todos:user:")
    /// - `CLEANUP_INTERVAL` - Local tier sweep frequency in seconds (default: 30)
    /// - `REDIS_ENABLED` - Use the distributed tier (default: true)
    /// - `REDIS_HOST` / `REDIS_PORT` - Redis address (default: localhost:6379)
    /// - `REDIS_PASSWORD` - Redis password (default: unset)
    /// - `AZURE_REDIS_SSL` - Connect over TLS (default: false)
    /// - `REDIS_CHANNEL` - Audit channel name (default: "log_channel")
    /// - `TIER_TIMEOUT_MS` - Distributed tier deadline (default: 250)
    /// - `SOURCE_TIMEOUT_MS` - Source of record deadline (default: 2000)
    /// - `SOURCE_LATENCY_MS` - Stub source latency (default: 10)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parse_env("TODO_API_PORT").unwrap_or(defaults.server_port),
            cache_ttl_ms: parse_env("CACHE_TTL_MS").unwrap_or(defaults.cache_ttl_ms),
            cache_prefix: env::var("CACHE_PREFIX").unwrap_or(defaults.cache_prefix),
            cleanup_interval: parse_env("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            redis_enabled: parse_env("REDIS_ENABLED").unwrap_or(defaults.redis_enabled),
            redis_host: env::var("REDIS_HOST").unwrap_or(defaults.redis_host),
            redis_port: parse_env("REDIS_PORT").unwrap_or(defaults.redis_port),
            redis_password: env::var("REDIS_PASSWORD").ok().filter(|p| !p.is_empty()),
            redis_tls: parse_env("AZURE_REDIS_SSL").unwrap_or(defaults.redis_tls),
            log_channel: env::var("REDIS_CHANNEL").unwrap_or(defaults.log_channel),
            tier_timeout_ms: parse_env("TIER_TIMEOUT_MS").unwrap_or(defaults.tier_timeout_ms),
            source_timeout_ms: parse_env("SOURCE_TIMEOUT_MS")
                .unwrap_or(defaults.source_timeout_ms),
            source_latency_ms: parse_env("SOURCE_LATENCY_MS")
                .unwrap_or(defaults.source_latency_ms),
        }
    }

    /// Connection URL for the Redis pool.
    ///
    /// Uses the `rediss://` scheme when TLS is enabled and embeds the
    /// percent-encoded password when one is configured.
    pub fn redis_url(&self) -> String {
        let scheme = if self.redis_tls { "rediss" } else { "redis" };
        match &self.redis_password {
            Some(password) => format!(
                "{}://:{}@{}:{}",
                scheme,
                urlencoding::encode(password),
                self.redis_host,
                self.redis_port
            ),
            None => format!("{}://{}:{}", scheme, self.redis_host, self.redis_port),
        }
    }

    /// TTL shared by both tiers, in whole seconds and never below one.
    ///
    /// Redis expiries have second granularity, so the local tier uses the
    /// same rounded value.
    pub fn cache_ttl_secs(&self) -> u64 {
        (self.cache_ttl_ms / 1000).max(1)
    }

    pub fn tier_timeout(&self) -> Duration {
        Duration::from_millis(self.tier_timeout_ms)
    }

    pub fn source_timeout(&self) -> Duration {
        Duration::from_millis(self.source_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8082,
            cache_ttl_ms: 300_000,
            cache_prefix: "todos:user:".to_string(),
            cleanup_interval: 30,
            redis_enabled: true,
            redis_host: "localhost".to_string(),
            redis_port: 6379,
            redis_password: None,
            redis_tls: false,
            log_channel: "log_channel".to_string(),
            tier_timeout_ms: 250,
            source_timeout_ms: 2000,
            source_latency_ms: 10,
        }
    }
}

fn parse_env<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
