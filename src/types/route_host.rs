// ABOUTME: DNS-compatible route host name validation.
// ABOUTME: Ensures route hosts follow RFC 1123 label requirements.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouteHostError {
    #[error("route host cannot be empty")]
    Empty,

    #[error("route host exceeds maximum length of 63 characters")]
    TooLong,

    #[error("route host cannot start with a hyphen")]
    StartsWithHyphen,

    #[error("route host cannot end with a hyphen")]
    EndsWithHyphen,

    #[error("invalid character in route host: '{0}'")]
    InvalidChar(char),
}

/// The host label of a route, e.g. `my-app` in `my-app.apps.example.com`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteHost(String);

impl RouteHost {
    pub fn new(value: &str) -> Result<Self, RouteHostError> {
        if value.is_empty() {
            return Err(RouteHostError::Empty);
        }

        if value.len() > 63 {
            return Err(RouteHostError::TooLong);
        }

        if value.starts_with('-') {
            return Err(RouteHostError::StartsWithHyphen);
        }

        if value.ends_with('-') {
            return Err(RouteHostError::EndsWithHyphen);
        }

        // The platform lowercases hosts, so uppercase is accepted and folded.
        for c in value.chars() {
            if !c.is_ascii_alphanumeric() && c != '-' {
                return Err(RouteHostError::InvalidChar(c));
            }
        }

        Ok(Self(value.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
