// ABOUTME: Logged-in session shared by every command that talks to the platform.
// ABOUTME: Connects with the configured credentials and resolves orgs, spaces, and apps by name.

use std::sync::Arc;

use cfkit::api::CfApiClient;
use cfkit::config::Config;
use cfkit::error::{Error, Result};
use cfkit::model::{App, Instance, Organization, Space};
use cfkit::service::{CloudFoundryService, LOGIN_FAILURE_MESSAGE};

pub struct Session {
    pub service: CloudFoundryService,
    pub instance: Arc<Instance>,
}

/// Log in to the configured target and register it as the active instance.
pub async fn connect(config: &Config) -> Result<Session> {
    let client = CfApiClient::from_config(&config.transport)?.with_credentials(config.auth.clone());
    let service = CloudFoundryService::new(Arc::new(client));

    let password = config.password()?;
    let result = service
        .connect(&config.target, &config.username, &password)
        .await?;

    let token = match (result.is_connected, result.token) {
        (true, Some(token)) => token,
        _ => {
            return Err(match result.error_message {
                Some(message) if message != LOGIN_FAILURE_MESSAGE => Error::OperationFailed(message),
                _ => Error::LoginFailed,
            });
        }
    };

    let name = config.instance_name();
    let instance = service.add_instance(&name, &config.target, &token)?;
    service.set_active(&name)?;
    tracing::info!(instance = %name, "connected");

    Ok(Session { service, instance })
}

impl Session {
    pub async fn find_org(&self, name: &str) -> Result<Arc<Organization>> {
        self.service
            .orgs_for_instance(&self.instance)
            .await
            .into_iter()
            .find(|org| org.name == name)
            .map(Arc::new)
            .ok_or_else(|| Error::NotFound {
                kind: "organization",
                name: name.to_string(),
            })
    }

    pub async fn find_space(&self, org: &Arc<Organization>, name: &str) -> Result<Arc<Space>> {
        self.service
            .spaces_for_org(org)
            .await
            .into_iter()
            .find(|space| space.name == name)
            .map(Arc::new)
            .ok_or_else(|| Error::NotFound {
                kind: "space",
                name: name.to_string(),
            })
    }

    pub async fn find_app(&self, space: &Arc<Space>, name: &str) -> Result<App> {
        self.service
            .apps_for_space(space)
            .await
            .into_iter()
            .find(|app| app.name == name)
            .ok_or_else(|| Error::NotFound {
                kind: "app",
                name: name.to_string(),
            })
    }
}
