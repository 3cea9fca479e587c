//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup and on reload):
//!     RouteConfig[] + registered resources
//!     → matcher.rs (compile each `{name}` template)
//!     → router.rs (order by priority and mount length)
//!     → Freeze as immutable RouteTable
//!
//! Incoming Request (path)
//!     → router.rs (mount prefix lookup → path info)
//!     → matcher.rs (first matching template → bindings)
//!     → bindings injected into the ParameterStore
//! ```
//!
//! # Design Decisions
//! - Templates compiled once, never per request
//! - Deterministic: same input always matches same route and template
//! - First match wins, both for routes and for a route's templates

pub mod matcher;
pub mod router;

pub use matcher::{Bindings, PathPattern, TemplateError};
pub use router::{Route, RouteError, RouteMatch, RouteTable};
