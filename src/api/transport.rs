// ABOUTME: HTTP transport construction and shared request helpers.
// ABOUTME: Certificate trust is decided once here instead of per call.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use snafu::ResultExt;
use url::Url;

use super::error::{ApiError, DecodeSnafu, InvalidTargetSnafu, Result, StatusSnafu, TransportSnafu};

const USER_AGENT: &str = concat!("cfkit/", env!("CARGO_PKG_VERSION"));

/// Transport settings shared by every call a client makes.
#[derive(Debug, Clone, Deserialize)]
pub struct TransportConfig {
    /// Accept any server certificate. Off unless explicitly enabled.
    #[serde(default)]
    pub skip_ssl_validation: bool,

    #[serde(default = "default_connect_timeout", with = "humantime_serde")]
    pub connect_timeout: Duration,

    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(60)
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            skip_ssl_validation: false,
            connect_timeout: default_connect_timeout(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl TransportConfig {
    /// Build the HTTP client all API components share.
    pub fn build_client(&self) -> std::result::Result<reqwest::Client, reqwest::Error> {
        if self.skip_ssl_validation {
            tracing::warn!("TLS certificate validation is disabled for platform API calls");
        }

        reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(self.connect_timeout)
            .timeout(self.request_timeout)
            .danger_accept_invalid_certs(self.skip_ssl_validation)
            .build()
    }
}

/// Parse a target string as an absolute http(s) URL with a host.
pub fn parse_target(target: &str) -> Result<Url> {
    let url = Url::parse(target.trim()).map_err(|e| ApiError::InvalidTarget {
        target: target.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") || url.host().is_none() {
        return InvalidTargetSnafu {
            target,
            reason: "expected an http or https URL with a host",
        }
        .fail();
    }

    Ok(url)
}

/// Join the platform root with a fixed resource path, replacing any path
/// and query the target carried.
pub fn endpoint(target: &str, path: &str, query: Option<&str>) -> Result<Url> {
    let mut url = parse_target(target)?;
    url.set_path(path);
    url.set_query(query);
    url.set_fragment(None);
    Ok(url)
}

/// Substitute the `:guid` placeholder of a path template.
pub fn with_guid(template: &str, guid: &str) -> String {
    template.replace(":guid", guid)
}

/// Attach bearer authorization and JSON accept headers.
pub(crate) fn authorized(builder: RequestBuilder, token: &str) -> RequestBuilder {
    builder
        .bearer_auth(token)
        .header(reqwest::header::ACCEPT, "application/json")
}

/// Send a request, mapping connection-level failures.
pub(crate) async fn send(builder: RequestBuilder, method: &Method, url: &Url) -> Result<Response> {
    tracing::debug!(%method, %url, "sending platform request");
    builder.send().await.context(TransportSnafu {
        method: method.clone(),
        uri: url.as_str(),
    })
}

/// Fail unless the response status satisfies `accept`.
pub(crate) fn expect_status(
    response: Response,
    method: &Method,
    url: &Url,
    accept: impl Fn(StatusCode) -> bool,
) -> Result<Response> {
    let status = response.status();
    if accept(status) {
        return Ok(response);
    }

    tracing::debug!(%method, %url, %status, "unexpected response status");
    StatusSnafu {
        method: method.clone(),
        uri: url.as_str(),
        status,
    }
    .fail()
}

/// Read the body and decode it as JSON.
pub(crate) async fn decode<T: DeserializeOwned>(
    response: Response,
    method: &Method,
    url: &Url,
) -> Result<T> {
    let body = response.text().await.context(TransportSnafu {
        method: method.clone(),
        uri: url.as_str(),
    })?;
    serde_json::from_str(&body).context(DecodeSnafu { uri: url.as_str() })
}

/// Convenience for the common "exact status, then decode" pattern.
pub(crate) async fn decode_with_status<T: DeserializeOwned>(
    response: Response,
    method: &Method,
    url: &Url,
    expected: StatusCode,
) -> Result<T> {
    let response = expect_status(response, method, url, |s| s == expected)?;
    decode(response, method, url).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiErrorKind;

    #[test]
    fn endpoint_replaces_path_and_query() {
        let url = endpoint(
            "https://api.example.com/some/path?x=1",
            "/v3/spaces",
            Some("organization_guids=org-1"),
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/v3/spaces?organization_guids=org-1"
        );
    }

    #[test]
    fn endpoint_keeps_explicit_port() {
        let url = endpoint("http://127.0.0.1:8080", "/v3/apps", None).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/v3/apps");
    }

    #[test]
    fn relative_target_is_invalid() {
        let err = parse_target("not-a-url").unwrap_err();
        assert_eq!(err.kind(), ApiErrorKind::InvalidTarget);
        assert_eq!(err.to_string(), "Invalid target URI");
    }

    #[test]
    fn non_http_scheme_is_invalid() {
        let err = parse_target("mailto:ops@example.com").unwrap_err();
        assert_eq!(err.kind(), ApiErrorKind::InvalidTarget);
    }

    #[test]
    fn guid_placeholder_is_substituted() {
        assert_eq!(
            with_guid("/v3/routes/:guid/destinations", "r-1"),
            "/v3/routes/r-1/destinations"
        );
    }

    #[test]
    fn default_transport_validates_certificates() {
        let config = TransportConfig::default();
        assert!(!config.skip_ssl_validation);
        assert!(config.build_client().is_ok());
    }
}
