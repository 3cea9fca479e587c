//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the binder.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BinderConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Route declarations mapping mounts and templates to resources.
    pub routes: Vec<RouteConfig>,

    /// Request size limits.
    pub limits: LimitsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// One route declaration.
///
/// ```toml
/// [[routes]]
/// name = "users"
/// mount = "/api/users"
/// templates = ["/{id}", "/{id}/{section}"]
/// resource = "users"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Route identifier for logging/metrics.
    pub name: String,

    /// Path prefix the route is mounted on.
    pub mount: String,

    /// Path templates tried in order against the path after the mount.
    #[serde(default)]
    pub templates: Vec<String>,

    /// Name of the registered resource serving this route.
    pub resource: String,

    /// Route priority (higher = checked first).
    #[serde(default)]
    pub priority: u32,
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum buffered body size in bytes.
    pub max_body_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: BinderConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert!(config.routes.is_empty());
        assert_eq!(config.limits.max_body_size, 2 * 1024 * 1024);
        assert_eq!(config.timeouts.request_secs, 30);
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn test_routes_parse() {
        let config: BinderConfig = toml::from_str(
            r#"
            [listener]
            bind_address = "127.0.0.1:3000"

            [[routes]]
            name = "users"
            mount = "/api/users"
            templates = ["/{id}", "/{id}/{section}"]
            resource = "users"

            [[routes]]
            name = "health"
            mount = "/health"
            resource = "health"
            priority = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.bind_address, "127.0.0.1:3000");
        assert_eq!(config.routes.len(), 2);
        assert_eq!(config.routes[0].templates, vec!["/{id}", "/{id}/{section}"]);
        assert!(config.routes[1].templates.is_empty());
        assert_eq!(config.routes[1].priority, 5);
    }
}
