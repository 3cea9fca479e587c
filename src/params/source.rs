//! Request input sources.
//!
//! # Responsibilities
//! - Collect multi-valued query and form parameters
//! - Canonicalize multi-valued parameters into one string
//! - Flatten a JSON object body into parameters
//!
//! # Design Decisions
//! - Query values come before form values of the same name
//! - A malformed or non-object JSON body yields no parameters (warned, not failed)
//! - Content types are matched by substring so `; charset=...` suffixes pass

use std::collections::HashMap;

use serde_json::Value;
use url::form_urlencoded;

use crate::params::coerce::value_to_param;

pub const APPLICATION_JSON: &str = "application/json";
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Parameter name to every value it was sent with, in arrival order.
pub type MultiValued = HashMap<String, Vec<String>>;

/// Returns true if the declared content type is JSON.
pub fn is_json(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| ct.to_ascii_lowercase().contains(APPLICATION_JSON))
        .unwrap_or(false)
}

/// Returns true if the declared content type is an urlencoded form.
pub fn is_form(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| ct.to_ascii_lowercase().contains(FORM_URLENCODED))
        .unwrap_or(false)
}

/// Append every `key=value` pair of an urlencoded input.
pub fn collect_urlencoded(input: &[u8], into: &mut MultiValued) {
    for (key, value) in form_urlencoded::parse(input) {
        into.entry(key.into_owned())
            .or_default()
            .push(value.into_owned());
    }
}

/// Query string plus, for form bodies, the urlencoded body.
pub fn multi_valued_params(query: Option<&str>, content_type: Option<&str>, body: &[u8]) -> MultiValued {
    let mut params = MultiValued::new();
    if let Some(query) = query {
        collect_urlencoded(query.as_bytes(), &mut params);
    }
    if is_form(content_type) && !body.is_empty() {
        collect_urlencoded(body, &mut params);
    }
    params
}

/// Single string form of a parameter's values.
///
/// No value yields `None`, one value is kept verbatim, several become a
/// JSON array of strings.
pub fn canonicalize(mut values: Vec<String>) -> Option<String> {
    match values.len() {
        0 => None,
        1 => values.pop(),
        _ => Some(Value::from(values).to_string()),
    }
}

/// Top-level keys of a JSON object body with their canonical string form.
pub fn json_body_params(body: &[u8]) -> Vec<(String, String)> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Vec::new();
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => map
            .into_iter()
            .map(|(key, value)| (key, value_to_param(value)))
            .collect(),
        Ok(other) => {
            tracing::warn!(kind = json_kind(&other), "JSON body is not an object, ignoring");
            Vec::new()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Malformed JSON body, ignoring");
            Vec::new()
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
