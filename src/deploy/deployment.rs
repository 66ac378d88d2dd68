// ABOUTME: Generic deployment struct parameterized by state marker.
// ABOUTME: Validates the request once; state types carry the identifiers produced so far.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::model::{Instance, Organization, Space};
use crate::types::{AppGuid, DomainGuid, RouteGuid, RouteHost};

use super::error::DeployError;
use super::state::{Initialized, Started};

/// Route to create and map to the app after its droplet is assigned.
#[derive(Debug, Clone)]
pub struct RouteSpec {
    pub domain: DomainGuid,
    pub host: RouteHost,
    pub path: String,
    pub port: Option<u16>,
    pub process_type: String,
    pub destination_port: Option<u16>,
}

/// What to push and where. Every field may be missing until validated.
#[derive(Debug, Clone, Default)]
pub struct DeployRequest {
    pub app_name: String,
    pub instance: Option<Arc<Instance>>,
    pub org: Option<Arc<Organization>>,
    pub space: Option<Arc<Space>>,
    pub output_dir: PathBuf,
    pub route: Option<RouteSpec>,
}

/// A validated request.
#[derive(Debug, Clone)]
pub struct DeployTarget {
    pub(crate) app_name: String,
    pub(crate) instance: Arc<Instance>,
    pub(crate) org: Arc<Organization>,
    pub(crate) space: Arc<Space>,
    pub(crate) output_dir: PathBuf,
    pub(crate) route: Option<RouteSpec>,
}

/// A deployment in progress, parameterized by its current state.
#[derive(Debug)]
pub struct Deployment<S> {
    pub(crate) target: DeployTarget,
    pub(crate) state: S,
}

impl Deployment<Initialized> {
    /// Check preconditions in a fixed order: app name, target, org, space.
    /// The first missing one is reported.
    ///
    /// # Errors
    ///
    /// Returns the precondition error; nothing has been sent.
    pub fn new(request: DeployRequest) -> Result<Self, DeployError> {
        if request.app_name.trim().is_empty() {
            return Err(DeployError::AppNameMissing);
        }
        let instance = request.instance.ok_or(DeployError::TargetMissing)?;
        let org = request.org.ok_or(DeployError::OrgMissing)?;
        let space = request.space.ok_or(DeployError::SpaceMissing)?;

        Ok(Deployment {
            target: DeployTarget {
                app_name: request.app_name.trim().to_string(),
                instance,
                org,
                space,
                output_dir: request.output_dir,
                route: request.route,
            },
            state: Initialized,
        })
    }
}

impl<S> Deployment<S> {
    pub fn app_name(&self) -> &str {
        &self.target.app_name
    }

    pub fn instance(&self) -> &Instance {
        &self.target.instance
    }

    pub fn org(&self) -> &Organization {
        &self.target.org
    }

    pub fn space(&self) -> &Space {
        &self.target.space
    }

    pub fn output_dir(&self) -> &Path {
        &self.target.output_dir
    }

    pub fn route(&self) -> Option<&RouteSpec> {
        self.target.route.as_ref()
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub(crate) fn api_address(&self) -> &str {
        self.target.instance.api_address()
    }

    pub(crate) fn token(&self) -> String {
        self.target.instance.access_token()
    }

    pub(crate) fn advance<T>(self, state: T) -> Deployment<T> {
        Deployment {
            target: self.target,
            state,
        }
    }
}

impl Deployment<Started> {
    pub fn app_guid(&self) -> &AppGuid {
        &self.state.app
    }

    pub fn route_guid(&self) -> Option<&RouteGuid> {
        self.state.route.as_ref()
    }
}
