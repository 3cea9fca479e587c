//! Handler reply values and their JSON rendering.

use serde::Serialize;
use serde_json::Value;

use crate::error::{RestError, RestResult};
use crate::marshal::bean::{bean_to_json, Bean, Jsonable, Serialized};
use crate::params::coerce::{is_array_shaped, is_object_shaped};

/// Anything a resource can reply with.
pub enum Payload {
    /// Renders its own JSON object.
    Convertible(Box<dyn Jsonable>),
    /// Already JSON; passed through untouched.
    Json(Value),
    /// Array or collection, converted element by element.
    List(Vec<Payload>),
    /// JSON text. Only `[...]` and `{...}` are accepted at the top level.
    Text(String),
    /// Marshalled field by field.
    Bean(Box<dyn Bean>),
}

impl Payload {
    pub fn convertible(value: impl Jsonable + 'static) -> Self {
        Payload::Convertible(Box::new(value))
    }

    pub fn bean(value: impl Bean + 'static) -> Self {
        Payload::Bean(Box::new(value))
    }

    /// Bean view of a serializable value.
    pub fn serialized<T: Serialize + ?Sized>(value: &T) -> Self {
        Payload::bean(Serialized::new(value))
    }

    pub fn list(items: impl IntoIterator<Item = impl Into<Payload>>) -> Self {
        Payload::List(items.into_iter().map(Into::into).collect())
    }

    /// Render the reply as a JSON value.
    ///
    /// Fails only for top-level text that is not JSON.
    pub fn into_json(self) -> RestResult<Value> {
        match self {
            Payload::Convertible(c) => Ok(Value::Object(c.to_json())),
            Payload::Json(value) => Ok(value),
            Payload::List(items) => Ok(Value::Array(items.into_iter().map(Payload::into_element).collect())),
            Payload::Text(text) => parse_json_text(&text),
            Payload::Bean(b) => Ok(Value::Object(bean_to_json(&*b))),
        }
    }

    /// Elements never fail: strings stay strings.
    fn into_element(self) -> Value {
        match self {
            Payload::Convertible(c) => Value::Object(c.to_json()),
            Payload::Json(value) => value,
            Payload::List(items) => Value::Array(items.into_iter().map(Payload::into_element).collect()),
            Payload::Text(text) => Value::String(text),
            Payload::Bean(b) => Value::Object(bean_to_json(&*b)),
        }
    }
}

fn parse_json_text(text: &str) -> RestResult<Value> {
    if !is_array_shaped(text) && !is_object_shaped(text) {
        return Err(RestError::UnsupportedJsonSource(text.to_string()));
    }
    serde_json::from_str(text).map_err(|e| RestError::UnsupportedJsonSource(format!("{e}: {text}")))
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Json(value)
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

impl From<Vec<Payload>> for Payload {
    fn from(items: Vec<Payload>) -> Self {
        Payload::List(items)
    }
}

impl std::fmt::Debug for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Payload::Convertible(_) => f.write_str("Convertible(..)"),
            Payload::Json(value) => f.debug_tuple("Json").field(value).finish(),
            Payload::List(items) => f.debug_tuple("List").field(items).finish(),
            Payload::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Payload::Bean(_) => f.write_str("Bean(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marshal::bean::{Property, PropertyError};
    use serde_json::{json, Map};

    struct Point {
        x: i32,
        y: i32,
    }

    impl Bean for Point {
        fn field_names(&self) -> Vec<String> {
            vec!["x".into(), "y".into()]
        }

        fn property(&self, name: &str) -> Result<Property<'_>, PropertyError> {
            match name {
                "x" => Ok(Property::value(self.x)),
                "y" => Ok(Property::value(self.y)),
                _ => Err(PropertyError::NoAccessor),
            }
        }
    }

    struct Shape;

    impl Jsonable for Shape {
        fn to_json(&self) -> Map<String, Value> {
            let mut map = Map::new();
            map.insert("kind".into(), json!("custom"));
            map
        }
    }

    #[test]
    fn test_convertible_wins() {
        let json = Payload::convertible(Shape).into_json().unwrap();
        assert_eq!(json, json!({"kind": "custom"}));
    }

    #[test]
    fn test_json_passthrough() {
        let value = json!([{"a": 1}, 2]);
        assert_eq!(Payload::from(value.clone()).into_json().unwrap(), value);
    }

    #[test]
    fn test_list_elements() {
        let payload = Payload::List(vec![
            Payload::convertible(Shape),
            Payload::from("[not reparsed]"),
            Payload::from(json!(3)),
            Payload::from(json!(true)),
            Payload::bean(Point { x: 1, y: 2 }),
            Payload::list(vec![Payload::from("nested")]),
        ]);
        assert_eq!(
            payload.into_json().unwrap(),
            json!([{"kind": "custom"}, "[not reparsed]", 3, true, {"x": 1, "y": 2}, ["nested"]])
        );
    }

    #[test]
    fn test_text_is_reparsed() {
        assert_eq!(Payload::from(r#"[1, "two"]"#).into_json().unwrap(), json!([1, "two"]));
        assert_eq!(Payload::from(r#" {"ok": true} "#).into_json().unwrap(), json!({"ok": true}));
    }

    #[test]
    fn test_plain_text_is_rejected() {
        let err = Payload::from("hello").into_json().unwrap_err();
        assert!(matches!(err, RestError::UnsupportedJsonSource(ref s) if s == "hello"));
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);

        let err = Payload::from("{broken").into_json().unwrap_err();
        assert!(matches!(err, RestError::UnsupportedJsonSource(_)));
    }

    #[test]
    fn test_bean_and_serialized() {
        assert_eq!(Payload::bean(Point { x: 3, y: 4 }).into_json().unwrap(), json!({"x": 3, "y": 4}));

        #[derive(Serialize)]
        struct Tag {
            label: String,
        }
        let tags = vec![Tag { label: "a".into() }, Tag { label: "b".into() }];
        let payload = Payload::list(tags.iter().map(Payload::serialized));
        assert_eq!(payload.into_json().unwrap(), json!([{"label": "a"}, {"label": "b"}]));
    }
}
