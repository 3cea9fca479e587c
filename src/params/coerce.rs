//! String to typed value coercion.
//!
//! # Responsibilities
//! - Convert a stored parameter string into a typed value
//! - Report malformed input as an explicit [`CoercionError`]
//!
//! # Design Decisions
//! - Pure functions, no access to the parameter store
//! - Integers use the strict std parsers (no trimming)
//! - Floats tolerate surrounding whitespace
//! - Booleans never fail: `true` in any case is true, anything else false
//! - Arrays are lenient: a value that is not `[...]` shaped becomes a
//!   single-element array; objects are strict

use serde_json::{Map, Value};
use thiserror::Error;

/// Reason a stored string could not be coerced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct CoercionError(pub String);

impl CoercionError {
    fn new(reason: impl std::fmt::Display) -> Self {
        Self(reason.to_string())
    }
}

/// Types that can be read out of the parameter store.
pub trait FromParam: Sized {
    /// Name used in error messages.
    const TYPE_NAME: &'static str;

    /// Parse the canonical string form of a parameter.
    fn from_param(raw: &str) -> Result<Self, CoercionError>;
}

macro_rules! from_param_via_from_str {
    ($ty:ty, $name:literal) => {
        impl FromParam for $ty {
            const TYPE_NAME: &'static str = $name;

            fn from_param(raw: &str) -> Result<Self, CoercionError> {
                raw.parse::<$ty>().map_err(CoercionError::new)
            }
        }
    };
}

from_param_via_from_str!(i8, "byte");
from_param_via_from_str!(i32, "int");
from_param_via_from_str!(i64, "long");

impl FromParam for f32 {
    const TYPE_NAME: &'static str = "float";

    fn from_param(raw: &str) -> Result<Self, CoercionError> {
        raw.trim().parse::<f32>().map_err(CoercionError::new)
    }
}

impl FromParam for f64 {
    const TYPE_NAME: &'static str = "double";

    fn from_param(raw: &str) -> Result<Self, CoercionError> {
        raw.trim().parse::<f64>().map_err(CoercionError::new)
    }
}

impl FromParam for bool {
    const TYPE_NAME: &'static str = "boolean";

    fn from_param(raw: &str) -> Result<Self, CoercionError> {
        Ok(raw.eq_ignore_ascii_case("true"))
    }
}

impl FromParam for String {
    const TYPE_NAME: &'static str = "string";

    fn from_param(raw: &str) -> Result<Self, CoercionError> {
        Ok(raw.to_string())
    }
}

impl FromParam for Vec<Value> {
    const TYPE_NAME: &'static str = "array";

    fn from_param(raw: &str) -> Result<Self, CoercionError> {
        parse_array(raw)
    }
}

impl FromParam for Vec<String> {
    const TYPE_NAME: &'static str = "list";

    fn from_param(raw: &str) -> Result<Self, CoercionError> {
        parse_list(raw)
    }
}

impl FromParam for Map<String, Value> {
    const TYPE_NAME: &'static str = "json";

    fn from_param(raw: &str) -> Result<Self, CoercionError> {
        parse_object(raw)
    }
}

/// Returns true if the value is written as a JSON array.
pub fn is_array_shaped(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.starts_with('[') && trimmed.ends_with(']')
}

/// Returns true if the value is written as a JSON object.
pub fn is_object_shaped(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.starts_with('{') && trimmed.ends_with('}')
}

/// Parse an array parameter.
///
/// `[...]` shaped values must be valid JSON arrays. Anything else is
/// wrapped into a single-element array of one string, so single and
/// multi-valued inputs read back the same way.
pub fn parse_array(raw: &str) -> Result<Vec<Value>, CoercionError> {
    if is_array_shaped(raw) {
        serde_json::from_str(raw).map_err(CoercionError::new)
    } else {
        Ok(vec![Value::String(raw.to_string())])
    }
}

/// Parse an array parameter into the string form of each element.
pub fn parse_list(raw: &str) -> Result<Vec<String>, CoercionError> {
    Ok(parse_array(raw)?.into_iter().map(value_to_param).collect())
}

/// Parse a JSON object parameter. No leniency.
pub fn parse_object(raw: &str) -> Result<Map<String, Value>, CoercionError> {
    serde_json::from_str(raw).map_err(CoercionError::new)
}

/// Canonical string form of a JSON value as stored in the parameter map.
///
/// Strings are stored verbatim; every other value keeps its JSON text.
pub fn value_to_param(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_integers_use_canonical_parsers() {
        assert_eq!(i32::from_param("42"), Ok(42));
        assert_eq!(i32::from_param("-7"), Ok(-7));
        assert_eq!(i64::from_param("9000000000"), Ok(9_000_000_000));
        assert_eq!(i8::from_param("-128"), Ok(-128));

        assert!(i8::from_param("128").is_err());
        assert!(i32::from_param("4.2").is_err());
        assert!(i32::from_param(" 42").is_err());
        assert!(i64::from_param("").is_err());
    }

    #[test]
    fn test_floats_trim_whitespace() {
        assert_eq!(f64::from_param(" 2.5 "), Ok(2.5));
        assert_eq!(f32::from_param("1e3"), Ok(1000.0));
        assert!(f64::from_param("two").is_err());
    }

    #[test]
    fn test_only_true_is_true() {
        assert_eq!(bool::from_param("true"), Ok(true));
        assert_eq!(bool::from_param("TRUE"), Ok(true));
        assert_eq!(bool::from_param("False"), Ok(false));
        assert_eq!(bool::from_param("yes"), Ok(false));
        assert_eq!(bool::from_param("1"), Ok(false));
        assert_eq!(bool::from_param(" true"), Ok(false));
        assert_eq!(bool::from_param(""), Ok(false));
    }

    #[test]
    fn test_array_wraps_plain_values() {
        assert_eq!(parse_array("a"), Ok(vec![json!("a")]));
        assert_eq!(parse_array(r#"["a","b"]"#), Ok(vec![json!("a"), json!("b")]));
        assert_eq!(parse_array("[1, true, null]"), Ok(vec![json!(1), json!(true), json!(null)]));
        assert!(parse_array("[1,").is_ok(), "not array shaped, wrapped as-is");
        assert!(parse_array("[1,]").is_err());
    }

    #[test]
    fn test_list_stringifies_elements() {
        assert_eq!(
            parse_list(r#"["a", 2, {"k": 1}]"#),
            Ok(vec!["a".to_string(), "2".to_string(), r#"{"k":1}"#.to_string()])
        );
        assert_eq!(parse_list("solo"), Ok(vec!["solo".to_string()]));
    }

    #[test]
    fn test_object_is_strict() {
        let obj = parse_object(r#"{"a": 1}"#).unwrap();
        assert_eq!(obj.get("a"), Some(&json!(1)));

        assert!(parse_object("a").is_err());
        assert!(parse_object("[1]").is_err());
        assert!(parse_object("{").is_err());
    }

    #[test]
    fn test_value_to_param() {
        assert_eq!(value_to_param(json!("plain")), "plain");
        assert_eq!(value_to_param(json!(3)), "3");
        assert_eq!(value_to_param(json!(null)), "null");
        assert_eq!(value_to_param(json!([1, "x"])), r#"[1,"x"]"#);
    }
}
