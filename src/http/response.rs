//! Response handling and transformation.
//!
//! # Responsibilities
//! - Render replies as `application/json; charset=utf-8`
//! - Wrap errors in the `{status, message, body}` envelope
//! - Map status codes to their short machine labels
//!
//! # Design Decisions
//! - Errors reset the response: only the envelope and status survive
//! - Serialization failures surface as `WriteFailure` (400)
//! - The label table is fixed; unknown codes get an empty label

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{RestError, RestResult};

pub const JSON_UTF8: &str = "application/json; charset=utf-8";

/// Standard response wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub status: u16,
    pub message: String,
    pub body: String,
}

impl Envelope {
    /// Envelope for a status code with a free-form body.
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            message: status_label(status.as_u16()).to_string(),
            body: body.into(),
        }
    }
}

/// Short snake_case label for an HTTP status code.
pub fn status_label(code: u16) -> &'static str {
    match code {
        100 => "continue",
        101 => "server_switching_protocols",
        200 => "successful_request",
        201 => "successful_created",
        202 => "accepted_request",
        203 => "invalid_origin",
        204 => "empty_response",
        205 => "should_reset",
        206 => "partial_response",
        300 => "multiples_choices",
        301 => "moved_permanently",
        302 => "moved_temporarily",
        303 => "see_other",
        304 => "not_modified",
        305 => "proxy_required",
        307 => "temporary_redirect",
        400 => "bad_request",
        401 => "authentication_required",
        402 => "payment_required",
        403 => "forbidden_request",
        404 => "not_found",
        405 => "method_not_allowed",
        406 => "not_acceptable_response",
        407 => "proxy_authentication_required",
        408 => "request_timeout",
        409 => "conflict",
        410 => "not_longer_available",
        411 => "content_length_required",
        412 => "precondition_failed",
        413 => "request_too_large",
        414 => "request_uri_too_long",
        415 => "unsupported_media_type",
        416 => "requested_range_not_satisfiable",
        417 => "expectation_failed",
        500 => "server_error",
        501 => "not_implemented",
        502 => "bad_gateway",
        503 => "server_overloaded",
        504 => "gateway_timeout",
        505 => "http_version_not_supported",
        _ => "",
    }
}

/// Serialize a JSON value into a response with the given status.
pub fn write_json(status: StatusCode, value: &Value) -> RestResult<Response> {
    let text = serde_json::to_string(value).map_err(|e| RestError::WriteFailure(e.to_string()))?;
    Ok(json_response(status, text))
}

fn json_response(status: StatusCode, text: String) -> Response {
    let mut response = Response::new(Body::from(text));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(JSON_UTF8));
    response
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let envelope = Envelope::new(status, self.to_string());
        match serde_json::to_string(&envelope) {
            Ok(text) => json_response(status, text),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize error envelope");
                let mut response = Response::new(Body::empty());
                *response.status_mut() = status;
                response
            }
        }
    }
}
