//! Reply marshalling.
//!
//! # Data Flow
//! ```text
//! Payload (handler reply)
//!     → Convertible  → Jsonable::to_json
//!     → Json         → unchanged
//!     → List         → per element (strings stay strings)
//!     → Text         → reparsed if `[...]` / `{...}`, else UnsupportedJsonSource
//!     → Bean         → bean.rs (field by field, skip unresolvable)
//!     → serde_json::Value
//! ```

pub mod bean;
pub mod payload;

pub use bean::{bean_to_json, select, select_all, Bean, Jsonable, Property, PropertyError, Serialized};
pub use payload::Payload;
