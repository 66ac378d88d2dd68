// ABOUTME: API error types with SNAFU pattern.
// ABOUTME: Separates invalid input, HTTP status, transport, and decode failures for programmatic handling.

use reqwest::{Method, StatusCode};
use snafu::Snafu;

/// Error returned by every platform API call.
///
/// Wrapper variants keep the underlying cause in `source()` rather than in
/// their display text, so a cause chain renders each layer exactly once.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ApiError {
    #[snafu(display("Invalid target URI"))]
    InvalidTarget { target: String, reason: String },

    #[snafu(display("Unable to locate authentication server"))]
    AuthServerLookup {
        #[snafu(source(from(ApiError, Box::new)))]
        source: Box<ApiError>,
    },

    #[snafu(display("Response from {method} `{uri}` was {status}"))]
    Status {
        method: Method,
        uri: String,
        status: StatusCode,
    },

    #[snafu(display("{method} `{uri}` could not be completed"))]
    Transport {
        method: Method,
        uri: String,
        source: reqwest::Error,
    },

    #[snafu(display("unable to decode response from `{uri}`"))]
    Decode {
        uri: String,
        source: serde_json::Error,
    },

    #[snafu(display("response from `{uri}` is missing {field}"))]
    MissingField { uri: String, field: &'static str },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Target URL could not be parsed.
    InvalidTarget,
    /// Platform root did not lead to an authorization server.
    AuthServerLookup,
    /// Server answered with an unexpected status.
    HttpStatus,
    /// Connection, TLS, or timeout failure.
    Transport,
    /// Body was not the expected JSON shape.
    Decode,
    /// Body decoded but lacked a required field.
    MissingField,
}

impl ApiError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> ApiErrorKind {
        match self {
            ApiError::InvalidTarget { .. } => ApiErrorKind::InvalidTarget,
            ApiError::AuthServerLookup { .. } => ApiErrorKind::AuthServerLookup,
            ApiError::Status { .. } => ApiErrorKind::HttpStatus,
            ApiError::Transport { .. } => ApiErrorKind::Transport,
            ApiError::Decode { .. } => ApiErrorKind::Decode,
            ApiError::MissingField { .. } => ApiErrorKind::MissingField,
        }
    }

    /// Returns the HTTP status if the server answered with an unexpected one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::AuthServerLookup { source } => source.status(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
