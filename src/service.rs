// ABOUTME: Domain-level façade over the API client.
// ABOUTME: Maps wire resources into the model and turns failures into empty, false, or explanation results.

use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

use crate::api::CfApiClient;
use crate::error::format_error_chain;
use crate::model::{App, Instance, InstanceRegistry, Organization, RegistryError, Space};
use crate::types::AppState;

pub const LOGIN_FAILURE_MESSAGE: &str = "Login failed.";

/// Invalid arguments, rejected before any request is made.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("target must not be empty")]
    MissingTarget,

    #[error("username must not be empty")]
    MissingUsername,
}

/// Outcome of a connection attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectResult {
    pub is_connected: bool,
    pub error_message: Option<String>,
    pub token: Option<String>,
}

impl ConnectResult {
    fn connected(token: String) -> Self {
        Self {
            is_connected: true,
            error_message: None,
            token: Some(token),
        }
    }

    fn failed(message: String) -> Self {
        Self {
            is_connected: false,
            error_message: Some(message),
            token: None,
        }
    }
}

/// Service used by front ends. Holds the instance registry and one API client.
pub struct CloudFoundryService {
    client: Arc<CfApiClient>,
    registry: RwLock<InstanceRegistry>,
}

impl CloudFoundryService {
    pub fn new(client: Arc<CfApiClient>) -> Self {
        Self {
            client,
            registry: RwLock::new(InstanceRegistry::new()),
        }
    }

    pub fn client(&self) -> &Arc<CfApiClient> {
        &self.client
    }

    // =========================================================================
    // Instances
    // =========================================================================

    pub fn add_instance(
        &self,
        name: &str,
        api_address: &str,
        access_token: &str,
    ) -> Result<Arc<Instance>, RegistryError> {
        self.registry
            .write()
            .add_instance(Instance::new(name, api_address, access_token))
    }

    pub fn instance(&self, name: &str) -> Option<Arc<Instance>> {
        self.registry.read().get(name)
    }

    pub fn instance_names(&self) -> Vec<String> {
        self.registry.read().names().map(str::to_string).collect()
    }

    pub fn set_active(&self, name: &str) -> Result<(), RegistryError> {
        self.registry.write().set_active(name)
    }

    pub fn active(&self) -> Option<Arc<Instance>> {
        self.registry.read().active()
    }

    /// Log in to `target`.
    ///
    /// # Errors
    ///
    /// Only argument validation fails; every login outcome, including
    /// transport failures, is reported through [`ConnectResult`].
    pub async fn connect(
        &self,
        target: &str,
        username: &str,
        password: &str,
    ) -> Result<ConnectResult, ServiceError> {
        if target.trim().is_empty() {
            return Err(ServiceError::MissingTarget);
        }
        if username.trim().is_empty() {
            return Err(ServiceError::MissingUsername);
        }

        let result = match self.client.login(target, username, password).await {
            Ok(Some(token)) if !token.is_empty() => ConnectResult::connected(token),
            Ok(_) => ConnectResult::failed(LOGIN_FAILURE_MESSAGE.to_string()),
            Err(e) => ConnectResult::failed(format_error_chain(&e)),
        };

        if let Some(ref message) = result.error_message {
            tracing::warn!(%target, error = %message, "connection failed");
        }
        Ok(result)
    }

    // =========================================================================
    // Listings
    // =========================================================================

    pub async fn orgs_for_instance(&self, instance: &Arc<Instance>) -> Vec<Organization> {
        let token = instance.access_token();
        match self.client.list_orgs(instance.api_address(), &token).await {
            Ok(orgs) => orgs
                .into_iter()
                .map(|org| Organization::from_resource(org, Arc::clone(instance)))
                .collect(),
            Err(e) => {
                tracing::warn!(instance = instance.name(), error = %format_error_chain(&e), "listing orgs failed");
                Vec::new()
            }
        }
    }

    pub async fn spaces_for_org(&self, org: &Arc<Organization>) -> Vec<Space> {
        let instance = org.instance();
        let token = instance.access_token();
        match self
            .client
            .list_spaces_for_org(instance.api_address(), &token, &org.guid)
            .await
        {
            Ok(spaces) => spaces
                .into_iter()
                .map(|space| Space::from_resource(space, Arc::clone(org)))
                .collect(),
            Err(e) => {
                tracing::warn!(org = %org.name, error = %format_error_chain(&e), "listing spaces failed");
                Vec::new()
            }
        }
    }

    pub async fn apps_for_space(&self, space: &Arc<Space>) -> Vec<App> {
        let instance = space.instance();
        let token = instance.access_token();
        match self
            .client
            .list_apps_for_space(instance.api_address(), &token, &space.guid)
            .await
        {
            Ok(apps) => apps
                .into_iter()
                .map(|app| App::from_resource(app, Arc::clone(space)))
                .collect(),
            Err(e) => {
                tracing::warn!(space = %space.name, error = %format_error_chain(&e), "listing apps failed");
                Vec::new()
            }
        }
    }

    // =========================================================================
    // App lifecycle
    // =========================================================================

    /// Start `app`, updating its state only once the platform reports it started.
    pub async fn start_app(&self, app: &mut App) -> bool {
        let instance = app.instance();
        let outcome = self
            .client
            .start_app(instance.api_address(), &instance.access_token(), &app.guid)
            .await;
        confirm(app, "start", outcome, AppState::Started)
    }

    /// Stop `app`, updating its state only once the platform reports it stopped.
    pub async fn stop_app(&self, app: &mut App) -> bool {
        let instance = app.instance();
        let outcome = self
            .client
            .stop_app(instance.api_address(), &instance.access_token(), &app.guid)
            .await;
        confirm(app, "stop", outcome, AppState::Stopped)
    }

    pub async fn delete_app(&self, app: &mut App) -> bool {
        let instance = app.instance();
        let outcome = self
            .client
            .delete_app(instance.api_address(), &instance.access_token(), &app.guid)
            .await
            .map(|()| true);
        confirm(app, "delete", outcome, AppState::Deleted)
    }
}

fn confirm(
    app: &mut App,
    action: &str,
    outcome: crate::api::Result<bool>,
    confirmed: AppState,
) -> bool {
    match outcome {
        Ok(true) => {
            tracing::info!(app = %app.name, %action, state = %confirmed, "app state confirmed");
            app.state = confirmed;
            true
        }
        Ok(false) => {
            tracing::warn!(app = %app.name, %action, "platform did not confirm app state");
            false
        }
        Err(e) => {
            tracing::warn!(app = %app.name, %action, error = %format_error_chain(&e), "app action failed");
            false
        }
    }
}
