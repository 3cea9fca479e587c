//! Route lookup.
//!
//! # Responsibilities
//! - Store compiled routes
//! - Find the route whose mount prefix covers a request path
//! - Split off the path info and bind it against the route's templates
//!
//! # Design Decisions
//! - Immutable after construction (shared without locks, swapped on reload)
//! - Mounts match on segment boundaries only
//! - Ordered by priority, then longest mount; declaration order breaks ties
//! - Explicit `None` on no match rather than a silent default

use std::sync::Arc;

use thiserror::Error;

use crate::config::RouteConfig;
use crate::http::resource::{Resource, Resources};
use crate::routing::matcher::{first_match, Bindings, PathPattern, TemplateError};

/// Errors raised while building a route table.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("route {route}: {source}")]
    Template {
        route: String,
        #[source]
        source: TemplateError,
    },

    #[error("route {route} refers to unknown resource {resource:?}")]
    UnknownResource { route: String, resource: String },
}

/// A mount prefix, its path templates and the resource serving it.
#[derive(Clone)]
pub struct Route {
    name: String,
    mount: String,
    patterns: Vec<PathPattern>,
    priority: u32,
    resource: Arc<dyn Resource>,
}

impl Route {
    /// Compile a route. `mount` is normalized without a trailing slash.
    pub fn new<S: AsRef<str>>(
        name: impl Into<String>,
        mount: &str,
        templates: &[S],
        resource: Arc<dyn Resource>,
    ) -> Result<Self, RouteError> {
        let name = name.into();
        let patterns = templates
            .iter()
            .map(|t| PathPattern::compile(t.as_ref()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| RouteError::Template {
                route: name.clone(),
                source,
            })?;

        Ok(Self {
            name,
            mount: normalize_mount(mount),
            patterns,
            priority: 0,
            resource,
        })
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mount(&self) -> &str {
        &self.mount
    }

    pub fn patterns(&self) -> &[PathPattern] {
        &self.patterns
    }

    pub fn resource(&self) -> &dyn Resource {
        self.resource.as_ref()
    }

    /// `None` if the mount does not cover `path`; otherwise the path info,
    /// which is itself `None` when the path is exactly the mount.
    pub fn path_info<'a>(&self, path: &'a str) -> Option<Option<&'a str>> {
        if self.mount.is_empty() {
            return Some(Some(path));
        }
        match path.strip_prefix(self.mount.as_str())? {
            "" => Some(None),
            rest if rest.starts_with('/') => Some(Some(rest)),
            _ => None,
        }
    }

    /// Bindings of the first template matching the path info.
    pub fn bind(&self, path_info: &str) -> Option<Bindings> {
        first_match(&self.patterns, path_info)
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("name", &self.name)
            .field("mount", &self.mount)
            .field("patterns", &self.patterns)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

fn normalize_mount(mount: &str) -> String {
    mount.trim_end_matches('/').to_string()
}

/// A matched route and the path info it leaves for template matching.
#[derive(Debug)]
pub struct RouteMatch<'r, 'p> {
    pub route: &'r Route,
    pub path_info: Option<&'p str>,
}

/// Immutable, ordered set of routes.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Order routes by priority, then by mount length (both descending).
    pub fn new(mut routes: Vec<Route>) -> Self {
        routes.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| b.mount.len().cmp(&a.mount.len()))
        });
        Self { routes }
    }

    /// Compile configured routes against the registered resources.
    pub fn from_config(configs: &[RouteConfig], resources: &Resources) -> Result<Self, RouteError> {
        let routes = configs
            .iter()
            .map(|config| {
                let resource = resources
                    .get(&config.resource)
                    .cloned()
                    .ok_or_else(|| RouteError::UnknownResource {
                        route: config.name.clone(),
                        resource: config.resource.clone(),
                    })?;
                Ok(Route::new(config.name.clone(), &config.mount, config.templates.as_slice(), resource)?
                    .with_priority(config.priority))
            })
            .collect::<Result<Vec<_>, RouteError>>()?;

        tracing::info!(routes = routes.len(), "Route table compiled");
        Ok(Self::new(routes))
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// First route whose mount covers `path`.
    pub fn resolve<'r, 'p>(&'r self, path: &'p str) -> Option<RouteMatch<'r, 'p>> {
        self.routes.iter().find_map(|route| {
            route
                .path_info(path)
                .map(|path_info| RouteMatch { route, path_info })
        })
    }
}
