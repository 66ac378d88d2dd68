// ABOUTME: State transition methods for the REST deployment pipeline.
// ABOUTME: Each method consumes self and returns the next state on success.

use std::time::Duration;

use crate::api::{CfApiClient, NewRoute};
use crate::api::models::BuildResource;
use crate::archive;

use super::Deployment;
use super::error::DeployError;
use super::state::{
    AppCreated, BitsPackaged, BitsUploaded, BuildCreated, BuildStaged, DropletAssigned,
    Initialized, PackageCreated, RouteBound, Started, Targeted,
};

// =============================================================================
// Initialized -> Targeted -> BitsPackaged
// =============================================================================

impl Deployment<Initialized> {
    /// Select the org and space. They must agree with each other.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::SpaceNotInOrg` if the space belongs to another org.
    #[must_use = "deployment state must be used"]
    pub fn target(self) -> Result<Deployment<Targeted>, DeployError> {
        if self.space().organization().guid != self.org().guid {
            return Err(DeployError::SpaceNotInOrg);
        }

        tracing::debug!(org = %self.org().name, space = %self.space().name, "targeted");
        Ok(self.advance(Targeted))
    }
}

impl Deployment<Targeted> {
    /// Zip the build output directory in memory.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Archive` wrapping `EmptyOutputDirectory` when
    /// there is nothing to push.
    #[must_use = "deployment state must be used"]
    pub async fn package_bits(self) -> Result<Deployment<BitsPackaged>, DeployError> {
        // Directory walking and file reads block; keep them off the runtime threads.
        let dir = self.output_dir().to_path_buf();
        let bits = tokio::task::spawn_blocking(move || archive::package_directory(&dir))
            .await
            .map_err(|e| DeployError::PackagingAborted(e.to_string()))??;
        tracing::debug!(size = bits.len(), "packaged build output");
        Ok(self.advance(BitsPackaged { bits }))
    }
}

// =============================================================================
// BitsPackaged -> AppCreated -> PackageCreated -> BitsUploaded
// =============================================================================

impl Deployment<BitsPackaged> {
    #[must_use = "deployment state must be used"]
    pub async fn create_app(self, client: &CfApiClient) -> Result<Deployment<AppCreated>, DeployError> {
        let app = client
            .create_app(self.api_address(), &self.token(), self.app_name(), &self.space().guid)
            .await
            .map_err(DeployError::platform("create app"))?;

        tracing::info!(app = %self.app_name(), guid = %app.guid, "created app");
        let Deployment { target, state } = self;
        Ok(Deployment {
            target,
            state: AppCreated {
                bits: state.bits,
                app: app.guid,
            },
        })
    }
}

impl Deployment<AppCreated> {
    #[must_use = "deployment state must be used"]
    pub async fn create_package(
        self,
        client: &CfApiClient,
    ) -> Result<Deployment<PackageCreated>, DeployError> {
        let package = client
            .create_package(self.api_address(), &self.token(), &self.state.app)
            .await
            .map_err(DeployError::platform("create package"))?;

        tracing::info!(guid = %package.guid, "created package");
        let Deployment { target, state } = self;
        Ok(Deployment {
            target,
            state: PackageCreated {
                bits: state.bits,
                app: state.app,
                package: package.guid,
            },
        })
    }
}

impl Deployment<PackageCreated> {
    #[must_use = "deployment state must be used"]
    pub async fn upload_bits(
        self,
        client: &CfApiClient,
    ) -> Result<Deployment<BitsUploaded>, DeployError> {
        let Deployment { target, state } = self;
        let PackageCreated { bits, app, package } = state;
        let deployment = Deployment {
            target,
            state: BitsUploaded { app, package },
        };

        client
            .upload_bits(
                deployment.api_address(),
                &deployment.token(),
                &deployment.state.package,
                bits,
            )
            .await
            .map_err(DeployError::platform("upload bits"))?;

        tracing::info!(package = %deployment.state.package, "uploaded bits");
        Ok(deployment)
    }
}

// =============================================================================
// BitsUploaded -> BuildCreated -> BuildStaged
// =============================================================================

impl Deployment<BitsUploaded> {
    #[must_use = "deployment state must be used"]
    pub async fn create_build(
        self,
        client: &CfApiClient,
    ) -> Result<Deployment<BuildCreated>, DeployError> {
        let build = client
            .create_build(self.api_address(), &self.token(), &self.state.package)
            .await
            .map_err(DeployError::platform("create build"))?;

        tracing::info!(guid = %build.guid, state = %build.state, "created build");
        let app = self.state.app.clone();
        Ok(self.advance(BuildCreated {
            app,
            build: build.guid,
        }))
    }
}

impl Deployment<BuildCreated> {
    /// Poll the build every `interval`, at most `attempts` times, until it
    /// is `STAGED` or `FAILED`.
    ///
    /// # Errors
    ///
    /// `DeployError::BuildFailed` with the platform's reason,
    /// `DeployError::StagingTimeout` if polls run out, or a platform error
    /// from any poll.
    #[must_use = "deployment state must be used"]
    pub async fn wait_for_staging(
        self,
        client: &CfApiClient,
        interval: Duration,
        attempts: u32,
    ) -> Result<Deployment<BuildStaged>, DeployError> {
        for attempt in 1..=attempts {
            let build = client
                .get_build(self.api_address(), &self.token(), &self.state.build)
                .await
                .map_err(DeployError::platform("get build"))?;

            tracing::debug!(attempt, state = %build.state, "polled build");
            match build.state.as_str() {
                BuildResource::STAGED => {
                    let droplet = build
                        .droplet
                        .ok_or_else(|| DeployError::MissingDroplet(build.guid.to_string()))?;
                    let app = self.state.app.clone();
                    return Ok(self.advance(BuildStaged {
                        app,
                        droplet: droplet.guid,
                    }));
                }
                BuildResource::FAILED => {
                    let reason = build.error.unwrap_or_else(|| "no reason given".to_string());
                    return Err(DeployError::BuildFailed(reason));
                }
                _ => {}
            }

            if attempt < attempts {
                tokio::time::sleep(interval).await;
            }
        }

        Err(DeployError::StagingTimeout(attempts))
    }
}

// =============================================================================
// BuildStaged -> DropletAssigned -> RouteBound -> Started
// =============================================================================

impl Deployment<BuildStaged> {
    #[must_use = "deployment state must be used"]
    pub async fn assign_droplet(
        self,
        client: &CfApiClient,
    ) -> Result<Deployment<DropletAssigned>, DeployError> {
        client
            .set_droplet(
                self.api_address(),
                &self.token(),
                &self.state.app,
                &self.state.droplet,
            )
            .await
            .map_err(DeployError::platform("set droplet"))?;

        tracing::info!(droplet = %self.state.droplet, "assigned droplet");
        let app = self.state.app.clone();
        Ok(self.advance(DropletAssigned { app }))
    }
}

impl Deployment<DropletAssigned> {
    /// Create the requested route and send it to the app. Without a route
    /// request this is a no-op.
    #[must_use = "deployment state must be used"]
    pub async fn bind_route(
        self,
        client: &CfApiClient,
    ) -> Result<Deployment<RouteBound>, DeployError> {
        let app = self.state.app.clone();
        let Some(spec) = self.route().cloned() else {
            return Ok(self.advance(RouteBound { app, route: None }));
        };

        let new_route = NewRoute {
            domain: spec.domain.clone(),
            host: spec.host.to_string(),
            path: spec.path.clone(),
            port: spec.port,
        };
        let token = self.token();
        let route = client
            .create_route(self.api_address(), &token, &self.space().guid, &new_route)
            .await
            .map_err(DeployError::platform("create route"))?;

        client
            .add_destination(
                self.api_address(),
                &token,
                &route.guid,
                &app,
                &spec.process_type,
                spec.destination_port,
            )
            .await
            .map_err(DeployError::platform("add route destination"))?;

        tracing::info!(host = %spec.host, route = %route.guid, "bound route");
        Ok(self.advance(RouteBound {
            app,
            route: Some(route.guid),
        }))
    }
}

impl Deployment<RouteBound> {
    /// Start the app. Only a reported `STARTED` state counts.
    #[must_use = "deployment state must be used"]
    pub async fn start(self, client: &CfApiClient) -> Result<Deployment<Started>, DeployError> {
        let started = client
            .start_app(self.api_address(), &self.token(), &self.state.app)
            .await
            .map_err(DeployError::platform("start app"))?;

        if !started {
            return Err(DeployError::NotConfirmed {
                step: "start app",
                reason: "platform did not report the app as STARTED".to_string(),
            });
        }

        tracing::info!(app = %self.app_name(), "app started");
        let RouteBound { app, route } = self.state.clone();
        Ok(self.advance(Started { app, route }))
    }
}
