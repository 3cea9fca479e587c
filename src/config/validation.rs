//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Compile every route template so bad ones fail at startup
//! - Validate value ranges and address formats
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BinderConfig → Result<(), Vec<ValidationError>>
//! - Resource names are checked when the route table is built, since
//!   resources are registered in code

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::BinderConfig;
use crate::routing::matcher::{PathPattern, TemplateError};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind address {0:?}")]
    BindAddress(String),

    #[error("invalid metrics address {0:?}")]
    MetricsAddress(String),

    #[error("route {route}: mount {mount:?} must start with '/'")]
    Mount { route: String, mount: String },

    #[error("route name {0:?} is declared more than once")]
    DuplicateRoute(String),

    #[error("route {route}: {source}")]
    Template { route: String, source: TemplateError },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
}

pub fn validate_config(config: &BinderConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.limits.max_body_size == 0 {
        errors.push(ValidationError::Zero { field: "limits.max_body_size" });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero { field: "timeouts.request_secs" });
    }

    let mut names = HashSet::new();
    for route in &config.routes {
        if !names.insert(route.name.as_str()) {
            errors.push(ValidationError::DuplicateRoute(route.name.clone()));
        }

        if !route.mount.starts_with('/') {
            errors.push(ValidationError::Mount {
                route: route.name.clone(),
                mount: route.mount.clone(),
            });
        }

        for template in &route.templates {
            if let Err(source) = PathPattern::compile(template) {
                errors.push(ValidationError::Template {
                    route: route.name.clone(),
                    source,
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::RouteConfig;

    fn route(name: &str, mount: &str, templates: &[&str]) -> RouteConfig {
        RouteConfig {
            name: name.into(),
            mount: mount.into(),
            templates: templates.iter().map(|t| t.to_string()).collect(),
            resource: name.into(),
            priority: 0,
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&BinderConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = BinderConfig::default();
        config.listener.bind_address = "nowhere".into();
        config.limits.max_body_size = 0;
        config.routes = vec![
            route("users", "/users", &["/{id}", "/{bad_name}"]),
            route("users", "orders", &["/{id}/{id}"]),
        ];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 6, "{errors:?}");
        assert!(errors.contains(&ValidationError::BindAddress("nowhere".into())));
        assert!(errors.contains(&ValidationError::DuplicateRoute("users".into())));
        assert!(errors.contains(&ValidationError::Zero { field: "limits.max_body_size" }));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::Mount { .. })));
        assert_eq!(
            errors
                .iter()
                .filter(|e| matches!(e, ValidationError::Template { .. }))
                .count(),
            2
        );
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = BinderConfig::default();
        config.observability.metrics_address = "bad".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::MetricsAddress("bad".into())])
        );
    }
}
