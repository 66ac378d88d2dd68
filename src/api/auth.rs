// ABOUTME: Authorization server discovery and password-grant token requests.
// ABOUTME: A rejected grant is a status code, not an error; only transport problems fail.

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use snafu::{OptionExt, ResultExt};
use url::Url;

use super::error::{AuthServerLookupSnafu, MissingFieldSnafu, Result};
use super::models::{RootInfo, TokenResponse};
use super::transport::{decode, decode_with_status, parse_target, send};

pub const DEFAULT_CLIENT_ID: &str = "cf";
pub const DEFAULT_CLIENT_SECRET: &str = "";
const TOKEN_SEGMENTS: [&str; 2] = ["oauth", "token"];

/// OAuth client identity used for the password grant.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientCredentials {
    #[serde(default = "default_client_id")]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
}

fn default_client_id() -> String {
    DEFAULT_CLIENT_ID.to_string()
}

impl Default for ClientCredentials {
    fn default() -> Self {
        Self {
            client_id: DEFAULT_CLIENT_ID.to_string(),
            client_secret: DEFAULT_CLIENT_SECRET.to_string(),
        }
    }
}

/// Finds the authorization server advertised by a platform root.
#[derive(Debug, Clone)]
pub struct AuthServerResolver {
    http: reqwest::Client,
}

impl AuthServerResolver {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Resolve the login server for `platform_root`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidTarget` without touching the network if the
    /// root is not an absolute http(s) URL, and `ApiError::AuthServerLookup`
    /// wrapping the underlying cause for any other failure.
    pub async fn resolve(&self, platform_root: &str) -> Result<Url> {
        let mut root = parse_target(platform_root)?;
        root.set_path("/");
        root.set_query(None);
        root.set_fragment(None);

        self.lookup(&root).await.context(AuthServerLookupSnafu)
    }

    async fn lookup(&self, root: &Url) -> Result<Url> {
        let method = Method::GET;
        let response = send(self.http.get(root.clone()), &method, root).await?;
        let info: RootInfo = decode_with_status(response, &method, root, StatusCode::OK).await?;

        let login = info.links.login.context(MissingFieldSnafu {
            uri: root.as_str(),
            field: "links.login.href",
        })?;

        let auth_server = parse_target(&login.href)?;
        tracing::debug!(%auth_server, "resolved authorization server");
        Ok(auth_server)
    }
}

/// Performs the resource-owner password grant and holds the resulting token.
#[async_trait]
pub trait TokenClient: Send + Sync {
    /// Request a token, returning the raw response status.
    ///
    /// Only `200 OK` stores a new token. Any other status is an expected
    /// outcome the caller interprets; errors are reserved for transport and
    /// decode failures.
    async fn request_token(
        &self,
        auth_server: &Url,
        credentials: &ClientCredentials,
        username: &str,
        password: &str,
    ) -> Result<StatusCode>;

    /// The token from the most recent successful grant.
    fn current_token(&self) -> Option<String>;
}

/// Token client for UAA-compatible authorization servers.
#[derive(Debug)]
pub struct UaaTokenClient {
    http: reqwest::Client,
    token: RwLock<Option<TokenResponse>>,
}

impl UaaTokenClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            token: RwLock::new(None),
        }
    }
}

#[async_trait]
impl TokenClient for UaaTokenClient {
    async fn request_token(
        &self,
        auth_server: &Url,
        credentials: &ClientCredentials,
        username: &str,
        password: &str,
    ) -> Result<StatusCode> {
        let url = token_url(auth_server);

        let method = Method::POST;
        let form = [
            ("grant_type", "password"),
            ("username", username),
            ("password", password),
        ];
        let builder = self
            .http
            .post(url.clone())
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&form);

        let response = send(builder, &method, &url).await?;
        let status = response.status();
        if status != StatusCode::OK {
            tracing::info!(%status, "token request was not granted");
            return Ok(status);
        }

        let token: TokenResponse = decode(response, &method, &url).await?;
        *self.token.write() = Some(token);
        Ok(status)
    }

    fn current_token(&self) -> Option<String> {
        self.token.read().as_ref().map(|t| t.access_token.clone())
    }
}

/// The grant endpoint beneath the login server, keeping any path prefix it has.
fn token_url(auth_server: &Url) -> Url {
    let mut url = auth_server.clone();
    url.set_query(None);
    url.set_fragment(None);
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().extend(TOKEN_SEGMENTS);
    }
    url
}
