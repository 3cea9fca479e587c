//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, timeout, body limit)
//!     → routing (mount lookup, template bindings)
//!     → request.rs (effective method, RequestContext)
//!     → resource.rs (method handler, then `process`)
//!     → response.rs (JSON body or error envelope)
//!     → Send to client
//! ```

pub mod request;
pub mod resource;
pub mod response;
pub mod server;

pub use request::{RequestContext, METHOD_OVERRIDE_PARAM, X_REQUEST_ID};
pub use resource::{Resource, Resources};
pub use response::{status_label, write_json, Envelope};
pub use server::{AppState, HttpServer};
