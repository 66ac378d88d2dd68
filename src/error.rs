// ABOUTME: Application-wide error types for cfkit.
// ABOUTME: Uses thiserror for ergonomic error handling, plus cause-chain formatting for display.

use std::path::PathBuf;
use thiserror::Error;

use crate::api::ApiError;
use crate::archive::ArchiveError;
use crate::model::RegistryError;
use crate::service::ServiceError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Login failed.")]
    LoginFailed,

    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    #[error("{0}")]
    OperationFailed(String),

    #[error("failed to build HTTP client")]
    HttpClient(#[from] reqwest::Error),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error("I/O error")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Render an error and each of its causes, outermost first, one per line.
pub fn format_error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut messages = vec![err.to_string()];
    let mut cause = err.source();
    while let Some(inner) = cause {
        messages.push(inner.to_string());
        cause = inner.source();
    }
    messages.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::{Method, StatusCode};

    #[test]
    fn chain_lists_outer_then_inner() {
        let err = ApiError::AuthServerLookup {
            source: Box::new(ApiError::Status {
                method: Method::GET,
                uri: "https://api.example.com/".to_string(),
                status: StatusCode::SERVICE_UNAVAILABLE,
            }),
        };

        assert_eq!(
            format_error_chain(&err),
            "Unable to locate authentication server\n\
             Response from GET `https://api.example.com/` was 503 Service Unavailable"
        );
    }

    #[test]
    fn single_error_has_no_separator() {
        assert_eq!(format_error_chain(&Error::LoginFailed), "Login failed.");
    }

    #[test]
    fn transparent_wrapper_does_not_repeat_message() {
        let err = Error::from(ApiError::InvalidTarget {
            target: "nope".to_string(),
            reason: "relative URL without a base".to_string(),
        });
        assert_eq!(format_error_chain(&err), "Invalid target URI");
    }

    #[test]
    fn wrapped_io_error_is_listed_once() {
        let err = Error::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "cannot open cfkit.yml",
        ));
        assert_eq!(format_error_chain(&err), "I/O error\ncannot open cfkit.yml");
    }

    #[test]
    fn yaml_error_is_not_repeated_in_outer_message() {
        let yaml_err = serde_yaml::from_str::<u32>("[").unwrap_err();
        let inner = yaml_err.to_string();
        let chain = format_error_chain(&Error::from(yaml_err));

        assert_eq!(chain.lines().next(), Some("YAML parse error"));
        assert_eq!(chain.matches(inner.as_str()).count(), 1);
    }
}
