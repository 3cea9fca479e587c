//! Per-request parameter store.
//!
//! # Responsibilities
//! - Merge query/form, JSON body and path parameters into one map
//! - Typed accessors with and without defaults
//!
//! # Design Decisions
//! - Later sources overwrite earlier ones: query/form, then body, then path
//! - Only the dispatcher mutates the store (path injection, method override)
//! - Defaulted accessors swallow every failure; absence and malformed
//!   values look the same to the caller

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::error::{RestError, RestResult};
use crate::params::coerce::FromParam;
use crate::params::source::{self, MultiValued};

/// Key to canonical string parameter map for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterStore {
    params: HashMap<String, String>,
}

impl ParameterStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the store from the raw request inputs.
    ///
    /// Path parameters are not known yet; the dispatcher injects them once
    /// a template has matched.
    pub fn from_request(query: Option<&str>, content_type: Option<&str>, body: &[u8]) -> Self {
        let mut store = Self::from_multi_valued(source::multi_valued_params(query, content_type, body));

        if source::is_json(content_type) {
            for (key, value) in source::json_body_params(body) {
                store.params.insert(key, value);
            }
        }

        store
    }

    /// Build the store from multi-valued parameters.
    pub fn from_multi_valued(params: MultiValued) -> Self {
        let params = params
            .into_iter()
            .filter_map(|(key, values)| source::canonicalize(values).map(|v| (key, v)))
            .collect();
        Self { params }
    }

    /// Insert or overwrite a parameter.
    pub(crate) fn inject(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    /// Remove a parameter, returning its value.
    pub(crate) fn take(&mut self, key: &str) -> Option<String> {
        self.params.remove(key)
    }

    /// Raw stored string for a key.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Iterate over all parameters in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Read and coerce a parameter.
    ///
    /// Fails with [`RestError::MissingParameter`] if the key is absent and
    /// [`RestError::InvalidParameterFormat`] if the value does not coerce.
    pub fn get<T: FromParam>(&self, key: &str) -> RestResult<T> {
        let raw = self
            .params
            .get(key)
            .ok_or_else(|| RestError::MissingParameter(key.to_string()))?;

        T::from_param(raw).map_err(|e| RestError::InvalidParameterFormat {
            name: key.to_string(),
            reason: format!("expected {}: {}", T::TYPE_NAME, e),
        })
    }

    /// Read and coerce a parameter, falling back to `default` on any failure.
    pub fn get_or<T: FromParam>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    pub fn get_byte(&self, key: &str) -> RestResult<i8> {
        self.get(key)
    }

    pub fn get_byte_or(&self, key: &str, default: i8) -> i8 {
        self.get_or(key, default)
    }

    pub fn get_int(&self, key: &str) -> RestResult<i32> {
        self.get(key)
    }

    pub fn get_int_or(&self, key: &str, default: i32) -> i32 {
        self.get_or(key, default)
    }

    pub fn get_long(&self, key: &str) -> RestResult<i64> {
        self.get(key)
    }

    pub fn get_long_or(&self, key: &str, default: i64) -> i64 {
        self.get_or(key, default)
    }

    pub fn get_float(&self, key: &str) -> RestResult<f32> {
        self.get(key)
    }

    pub fn get_float_or(&self, key: &str, default: f32) -> f32 {
        self.get_or(key, default)
    }

    pub fn get_double(&self, key: &str) -> RestResult<f64> {
        self.get(key)
    }

    pub fn get_double_or(&self, key: &str, default: f64) -> f64 {
        self.get_or(key, default)
    }

    pub fn get_boolean(&self, key: &str) -> RestResult<bool> {
        self.get(key)
    }

    pub fn get_boolean_or(&self, key: &str, default: bool) -> bool {
        self.get_or(key, default)
    }

    pub fn get_string(&self, key: &str) -> RestResult<String> {
        self.get(key)
    }

    pub fn get_string_or(&self, key: &str, default: impl Into<String>) -> String {
        self.get(key).unwrap_or_else(|_| default.into())
    }

    /// JSON array; plain values come back as a one-element array.
    pub fn get_array(&self, key: &str) -> RestResult<Vec<Value>> {
        self.get(key)
    }

    pub fn get_array_or(&self, key: &str, default: Vec<Value>) -> Vec<Value> {
        self.get_or(key, default)
    }

    /// Array elements in their string form.
    pub fn get_list(&self, key: &str) -> RestResult<Vec<String>> {
        self.get(key)
    }

    pub fn get_list_or(&self, key: &str, default: Vec<String>) -> Vec<String> {
        self.get_or(key, default)
    }

    /// JSON object, parsed strictly.
    pub fn get_json(&self, key: &str) -> RestResult<Map<String, Value>> {
        self.get(key)
    }

    pub fn get_json_or(&self, key: &str, default: Map<String, Value>) -> Map<String, Value> {
        self.get_or(key, default)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParameterStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            params: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}
