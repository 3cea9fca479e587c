//! Request-scoped error definitions.
//!
//! Every failure raised while binding, dispatching or marshalling a request
//! is a [`RestError`]. Each variant carries the HTTP status it is surfaced
//! with; the response layer turns it into the JSON envelope.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors surfaced to the client through the response envelope.
#[derive(Debug, Error)]
pub enum RestError {
    /// Accessor without default called for an absent key.
    #[error("Parameter {0} doesn't exist")]
    MissingParameter(String),

    /// Value present but not coercible to the requested type.
    #[error("Parameter {name} has an invalid format: {reason}")]
    InvalidParameterFormat { name: String, reason: String },

    /// Marshaller given a string that is not JSON text.
    #[error("Resource cannot be interpreted as JSON: {0}")]
    UnsupportedJsonSource(String),

    /// Rendering the response body failed.
    #[error("Failed to write response: {0}")]
    WriteFailure(String),

    /// Failure raised with an explicit status code.
    #[error("{message}")]
    Status { status: StatusCode, message: String },

    /// Failure that was not raised as a structured error.
    #[error("{0}")]
    Unexpected(String),
}

impl RestError {
    /// Raise an error with an explicit status code.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Wrap an arbitrary failure. Surfaced as 400 with the raw message.
    pub fn unexpected(err: impl std::fmt::Display) -> Self {
        Self::Unexpected(err.to_string())
    }

    /// HTTP status this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::Status { status, .. } => *status,
            RestError::MissingParameter(_)
            | RestError::InvalidParameterFormat { .. }
            | RestError::UnsupportedJsonSource(_)
            | RestError::WriteFailure(_)
            | RestError::Unexpected(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            RestError::MissingParameter(_) => "missing_parameter",
            RestError::InvalidParameterFormat { .. } => "invalid_parameter_format",
            RestError::UnsupportedJsonSource(_) => "unsupported_json_source",
            RestError::WriteFailure(_) => "write_failure",
            RestError::Status { .. } => "status",
            RestError::Unexpected(_) => "unexpected",
        }
    }
}

/// Result type for request handling.
pub type RestResult<T> = Result<T, RestError>;
