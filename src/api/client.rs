// ABOUTME: Platform API façade: login and paginated resource listings.
// ABOUTME: Composes the auth resolver, token client, and page walker over one HTTP client.

use std::sync::Arc;

use parking_lot::RwLock;
use reqwest::StatusCode;

use super::auth::{AuthServerResolver, ClientCredentials, TokenClient, UaaTokenClient};
use super::error::Result;
use super::models::{AppResource, OrgResource, SpaceResource};
use super::pagination::{app_page, org_page, space_page, walk_pages};
use super::paths;
use super::transport::{TransportConfig, endpoint};
use crate::types::{OrgGuid, SpaceGuid};

/// Client for a v3 platform API.
///
/// Every operation takes the target API root and the bearer token explicitly,
/// so one client can serve several registered instances. The HTTP client and
/// token client are injected at construction and never shared through
/// globals.
pub struct CfApiClient {
    pub(crate) http: reqwest::Client,
    resolver: AuthServerResolver,
    token_client: Arc<dyn TokenClient>,
    credentials: ClientCredentials,
    access_token: RwLock<Option<String>>,
}

impl std::fmt::Debug for CfApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CfApiClient")
            .field("client_id", &self.credentials.client_id)
            .field("has_token", &self.access_token.read().is_some())
            .finish()
    }
}

impl CfApiClient {
    pub fn new(http: reqwest::Client, token_client: Arc<dyn TokenClient>) -> Self {
        Self {
            resolver: AuthServerResolver::new(http.clone()),
            http,
            token_client,
            credentials: ClientCredentials::default(),
            access_token: RwLock::new(None),
        }
    }

    /// Build a client whose token requests go through a UAA token client
    /// sharing the same transport.
    pub fn from_config(transport: &TransportConfig) -> std::result::Result<Self, reqwest::Error> {
        let http = transport.build_client()?;
        let token_client = Arc::new(UaaTokenClient::new(http.clone()));
        Ok(Self::new(http, token_client))
    }

    /// Use a non-default OAuth client identity for logins.
    pub fn with_credentials(mut self, credentials: ClientCredentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Token from the most recent successful login.
    pub fn access_token(&self) -> Option<String> {
        self.access_token.read().clone()
    }

    /// Log in to `target` with a password grant.
    ///
    /// Returns `Ok(None)` when the authorization server refuses the
    /// credentials; the stored token is left as it was.
    ///
    /// # Errors
    ///
    /// `ApiError::InvalidTarget` before any request if `target` is not an
    /// absolute http(s) URL; `ApiError::AuthServerLookup` if the login server
    /// cannot be discovered; transport errors from the token request.
    pub async fn login(&self, target: &str, username: &str, password: &str) -> Result<Option<String>> {
        let auth_server = self.resolver.resolve(target).await?;

        let status = self
            .token_client
            .request_token(&auth_server, &self.credentials, username, password)
            .await?;

        if status != StatusCode::OK {
            return Ok(None);
        }

        let token = self.token_client.current_token();
        if let Some(ref token) = token {
            *self.access_token.write() = Some(token.clone());
            tracing::info!(%target, "logged in");
        }
        Ok(token)
    }

    /// All organizations visible to the token.
    pub async fn list_orgs(&self, target: &str, token: &str) -> Result<Vec<OrgResource>> {
        let first = endpoint(target, paths::ORGANIZATIONS, None)?;
        walk_pages(&self.http, first, token, org_page).await
    }

    /// All spaces visible to the token.
    pub async fn list_spaces(&self, target: &str, token: &str) -> Result<Vec<SpaceResource>> {
        let first = endpoint(target, paths::SPACES, None)?;
        walk_pages(&self.http, first, token, space_page).await
    }

    /// Spaces belonging to one organization.
    pub async fn list_spaces_for_org(
        &self,
        target: &str,
        token: &str,
        org: &OrgGuid,
    ) -> Result<Vec<SpaceResource>> {
        let query = format!("organization_guids={org}");
        let first = endpoint(target, paths::SPACES, Some(&query))?;
        walk_pages(&self.http, first, token, space_page).await
    }

    /// Apps belonging to one space.
    pub async fn list_apps_for_space(
        &self,
        target: &str,
        token: &str,
        space: &SpaceGuid,
    ) -> Result<Vec<AppResource>> {
        let query = format!("space_guids={space}");
        let first = endpoint(target, paths::APPS, Some(&query))?;
        walk_pages(&self.http, first, token, app_page).await
    }
}
