//! Field-level JSON capabilities.
//!
//! # Responsibilities
//! - [`Jsonable`]: types that render their own JSON object
//! - [`Bean`]: types that expose named properties for generic marshalling
//! - Full and selective bean marshalling
//!
//! # Design Decisions
//! - A bean lists its declared fields and resolves each one by name;
//!   a field it cannot resolve is skipped with a warning, never an error
//! - Convertible and bean properties are marshalled recursively
//! - Any `Serialize` type becomes a bean through [`Serialized`]

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// A value that supplies its own JSON object representation.
pub trait Jsonable: Send + Sync {
    fn to_json(&self) -> Map<String, Value>;
}

/// Why a property could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    /// The field exists but exposes no readable value.
    #[error("no accessor")]
    NoAccessor,

    /// Reading the value failed.
    #[error("accessor failed: {0}")]
    Failed(String),
}

/// The value of one bean property.
pub enum Property<'a> {
    /// Stored as-is.
    Value(Value),
    /// Rendered through its own `to_json`.
    Convertible(&'a dyn Jsonable),
    /// Marshalled field by field.
    Bean(&'a dyn Bean),
    /// Marshalled element by element.
    List(Vec<Property<'a>>),
}

impl<'a> Property<'a> {
    pub fn value(value: impl Into<Value>) -> Self {
        Property::Value(value.into())
    }

    pub fn convertible(value: &'a dyn Jsonable) -> Self {
        Property::Convertible(value)
    }

    pub fn bean(value: &'a dyn Bean) -> Self {
        Property::Bean(value)
    }

    pub fn list(items: impl IntoIterator<Item = Property<'a>>) -> Self {
        Property::List(items.into_iter().collect())
    }

    fn into_json(self) -> Value {
        match self {
            Property::Value(value) => value,
            Property::Convertible(c) => Value::Object(c.to_json()),
            Property::Bean(b) => Value::Object(bean_to_json(b)),
            Property::List(items) => Value::Array(items.into_iter().map(Property::into_json).collect()),
        }
    }
}

/// A type marshalled by enumerating its fields.
pub trait Bean: Send + Sync {
    /// Declared field names, in declaration order.
    fn field_names(&self) -> Vec<String>;

    /// Resolve one field by name.
    fn property(&self, name: &str) -> Result<Property<'_>, PropertyError>;
}

/// Marshal every declared field of a bean.
pub fn bean_to_json(bean: &dyn Bean) -> Map<String, Value> {
    select(bean, bean.field_names().as_slice())
}

/// Marshal only the named fields of a bean.
pub fn select<S: AsRef<str>>(bean: &dyn Bean, names: &[S]) -> Map<String, Value> {
    let mut json = Map::new();
    for name in names {
        let name = name.as_ref();
        match bean.property(name) {
            Ok(property) => {
                json.insert(name.to_string(), property.into_json());
            }
            Err(e) => {
                tracing::warn!(field = %name, error = %e, "Skipping field while creating JSON");
            }
        }
    }
    json
}

/// Marshal the named fields of each bean in a sequence.
pub fn select_all<'a, B, S>(beans: impl IntoIterator<Item = &'a B>, names: &[S]) -> Vec<Value>
where
    B: Bean + 'a,
    S: AsRef<str>,
{
    beans
        .into_iter()
        .map(|bean| Value::Object(select(bean, names)))
        .collect()
}

/// Bean view of any serializable value.
///
/// The value is serialized once; its object keys become the field names.
/// Values that do not serialize to an object have no fields.
#[derive(Debug, Clone)]
pub struct Serialized {
    fields: Result<Map<String, Value>, String>,
}

impl Serialized {
    pub fn new<T: Serialize + ?Sized>(value: &T) -> Self {
        let fields = match serde_json::to_value(value) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(format!("serialized to {other} instead of an object")),
            Err(e) => Err(e.to_string()),
        };
        Self { fields }
    }
}

impl Bean for Serialized {
    fn field_names(&self) -> Vec<String> {
        match &self.fields {
            Ok(map) => map.keys().cloned().collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Value has no serializable fields");
                Vec::new()
            }
        }
    }

    fn property(&self, name: &str) -> Result<Property<'_>, PropertyError> {
        let map = self.fields.as_ref().map_err(|e| PropertyError::Failed(e.clone()))?;
        map.get(name)
            .cloned()
            .map(Property::Value)
            .ok_or(PropertyError::NoAccessor)
    }
}
