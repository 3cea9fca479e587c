//! Request handling and transformation.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4)
//! - Resolve the effective method (`_METHOD` override on POST)
//! - Bundle everything a resource may read into one immutable context
//!
//! # Design Decisions
//! - The context is built once, after path injection, and only lent to handlers
//! - The override parameter is consumed on POST so handlers never see it
//! - An override that is not a valid method token leaves POST in place

use axum::http::{HeaderMap, HeaderValue, Method, Request};
use percent_encoding::percent_decode_str;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::error::RestResult;
use crate::params::{FromParam, ParameterStore};

pub const X_REQUEST_ID: &str = "x-request-id";

/// Form/body field that overrides the method of a POST request.
pub const METHOD_OVERRIDE_PARAM: &str = "_METHOD";

/// Generates `x-request-id` values.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Method used for dispatch.
///
/// On POST the override parameter is always removed; a non-empty, valid
/// value replaces the method.
pub(crate) fn effective_method(method: &Method, params: &mut ParameterStore) -> Method {
    if method != Method::POST {
        return method.clone();
    }

    let Some(raw) = params.take(METHOD_OVERRIDE_PARAM) else {
        return method.clone();
    };

    let requested = raw.trim().to_ascii_uppercase();
    if requested.is_empty() {
        return method.clone();
    }

    match Method::from_bytes(requested.as_bytes()) {
        Ok(overridden) => {
            tracing::debug!(method = %overridden, "Method overridden by request parameter");
            overridden
        }
        Err(_) => {
            tracing::warn!(value = %raw, "Ignoring invalid method override");
            method.clone()
        }
    }
}

/// Percent-decoded path info. Input that does not decode to UTF-8 is kept raw.
pub(crate) fn decode_path_info(raw: &str) -> String {
    match percent_decode_str(raw).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => {
            tracing::debug!(path_info = %raw, "Path info is not UTF-8 once decoded, keeping it raw");
            raw.to_string()
        }
    }
}

/// Everything a resource can read about the current request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: String,
    method: Method,
    original_method: Method,
    path: String,
    path_info: Option<String>,
    headers: HeaderMap,
    params: ParameterStore,
}

impl RequestContext {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        request_id: String,
        method: Method,
        original_method: Method,
        path: String,
        path_info: Option<String>,
        headers: HeaderMap,
        params: ParameterStore,
    ) -> Self {
        Self {
            request_id,
            method,
            original_method,
            path,
            path_info,
            headers,
            params,
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Method used for dispatch, after any override.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Method the client actually sent.
    pub fn original_method(&self) -> &Method {
        &self.original_method
    }

    /// Full request path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Part of the path after the route mount, if any.
    pub fn path_info(&self) -> Option<&str> {
        self.path_info.as_deref()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Header value as text, if present and valid.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Merged query, body and path parameters.
    pub fn params(&self) -> &ParameterStore {
        &self.params
    }

    /// Shorthand for `params().get(key)`.
    pub fn param<T: FromParam>(&self, key: &str) -> RestResult<T> {
        self.params.get(key)
    }

    /// Shorthand for `params().get_or(key, default)`.
    pub fn param_or<T: FromParam>(&self, key: &str, default: T) -> T {
        self.params.get_or(key, default)
    }
}
