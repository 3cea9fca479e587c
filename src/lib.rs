//! REST parameter binding library.
//!
//! Binds query, form, JSON-body and path-template parameters into one
//! typed store per request, dispatches to application resources, and
//! marshals their replies into JSON.

// Core subsystems
pub mod config;
pub mod error;
pub mod http;
pub mod marshal;
pub mod params;
pub mod routing;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::schema::BinderConfig;
pub use error::{RestError, RestResult};
pub use http::{HttpServer, RequestContext, Resource, Resources};
pub use lifecycle::Shutdown;
pub use marshal::Payload;
pub use params::ParameterStore;
