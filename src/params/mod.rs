//! Request parameter binding.
//!
//! # Data Flow
//! ```text
//! query string ─┐
//! form body    ─┼→ source.rs (collect, canonicalize multi-values)
//! JSON body    ─┘        │
//!                        ▼
//!                 store.rs (ParameterStore)
//!                        ▲
//! path bindings ─────────┘ (injected by the dispatcher after matching)
//!
//! handler → store accessors → coerce.rs → typed value | RestError (400)
//! ```

pub mod coerce;
pub mod source;
pub mod store;

pub use coerce::{CoercionError, FromParam};
pub use store::ParameterStore;
