// ABOUTME: Runs a whole push, step by step, and reports a single outcome.
// ABOUTME: Drives either the v3 REST state machine or the external cf CLI.

use std::sync::Arc;
use std::time::Duration;

use crate::api::CfApiClient;
use crate::archive::ArchiveError;
use crate::cf_cli::CfCli;
use crate::config::DeploySettings;
use crate::error::format_error_chain;

use super::cancel::CancelToken;
use super::deployment::{DeployRequest, Deployment};
use super::error::DeployError;
use super::state::{Initialized, Started};
use super::strategy::DeployStrategy;

/// Result of a push: success, or the explanation of the first failing step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOutcome {
    pub succeeded: bool,
    pub explanation: Option<String>,
}

impl DeployOutcome {
    fn success() -> Self {
        Self {
            succeeded: true,
            explanation: None,
        }
    }

    fn failure(err: &DeployError) -> Self {
        Self {
            succeeded: false,
            explanation: Some(format_error_chain(err)),
        }
    }
}

pub struct Orchestrator {
    client: Arc<CfApiClient>,
    cli: Option<CfCli>,
    settings: DeploySettings,
    cancel: CancelToken,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("strategy", &self.settings.strategy)
            .field("has_cli", &self.cli.is_some())
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    pub fn new(client: Arc<CfApiClient>, settings: DeploySettings) -> Self {
        Self {
            client,
            cli: None,
            settings,
            cancel: CancelToken::new(),
        }
    }

    /// Attach the cf CLI used by the CLI strategy.
    pub fn with_cli(mut self, cli: CfCli) -> Self {
        self.cli = Some(cli);
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Push the requested app. Never fails: errors become the outcome's explanation.
    pub async fn deploy(&self, request: DeployRequest) -> DeployOutcome {
        self.deploy_with_progress(request, &mut |_: &str| {}).await
    }

    /// Like [`deploy`](Self::deploy), reporting each step as it begins.
    pub async fn deploy_with_progress(
        &self,
        request: DeployRequest,
        progress: &mut (dyn for<'l> FnMut(&'l str) + Send),
    ) -> DeployOutcome {
        let result = match self.settings.strategy {
            DeployStrategy::Rest => self.run_rest(request, progress).await.map(|_| ()),
            DeployStrategy::Cli => self.run_cli(request, progress).await,
        };

        match result {
            Ok(()) => DeployOutcome::success(),
            Err(err) => {
                tracing::warn!(error = %err, kind = ?err.kind(), "deployment failed");
                DeployOutcome::failure(&err)
            }
        }
    }

    /// Push through the v3 API. Each step runs under the cancel token and
    /// the configured step limit; the first failure ends the push.
    pub async fn run_rest(
        &self,
        request: DeployRequest,
        progress: &mut (dyn for<'l> FnMut(&'l str) + Send),
    ) -> Result<Deployment<Started>, DeployError> {
        let deployment: Deployment<Initialized> = Deployment::new(request)?;
        let client = self.client.as_ref();
        let limit = self.settings.step_timeout;

        progress("Selecting org and space");
        let deployment = self.step("target", limit, async move { deployment.target() }).await?;

        progress("Packaging build output");
        let deployment = self
            .step("package bits", limit, deployment.package_bits())
            .await?;

        progress("Creating app");
        let deployment = self
            .step("create app", limit, deployment.create_app(client))
            .await?;

        progress("Creating package");
        let deployment = self
            .step("create package", limit, deployment.create_package(client))
            .await?;

        progress("Uploading bits");
        let deployment = self
            .step("upload bits", limit, deployment.upload_bits(client))
            .await?;

        progress("Creating build");
        let deployment = self
            .step("create build", limit, deployment.create_build(client))
            .await?;

        progress("Waiting for staging");
        let interval = self.settings.build_poll_interval;
        let attempts = self.settings.build_poll_attempts;
        let deployment = self
            .step(
                "wait for staging",
                staging_limit(limit, interval, attempts),
                deployment.wait_for_staging(client, interval, attempts),
            )
            .await?;

        progress("Assigning droplet");
        let deployment = self
            .step("assign droplet", limit, deployment.assign_droplet(client))
            .await?;

        progress("Binding route");
        let deployment = self
            .step("bind route", limit, deployment.bind_route(client))
            .await?;

        progress("Starting app");
        self.step("start app", limit, deployment.start(client)).await
    }

    /// Push with `cf target` then `cf push` from the build output directory.
    pub async fn run_cli(
        &self,
        request: DeployRequest,
        progress: &mut (dyn for<'l> FnMut(&'l str) + Send),
    ) -> Result<(), DeployError> {
        let deployment = Deployment::new(request)?;
        let cli = self
            .cli
            .as_ref()
            .ok_or_else(|| DeployError::Cli(crate::cf_cli::CF_NOT_FOUND_MESSAGE.to_string()))?;

        if !cli.locator().directory_contains_files(deployment.output_dir()) {
            return Err(ArchiveError::EmptyOutputDirectory(deployment.output_dir().to_path_buf()).into());
        }

        let limit = self.settings.step_timeout;
        let org = deployment.org().name.clone();
        let space = deployment.space().name.clone();

        progress("Running cf target");
        self.step("cf target", limit, async {
            let outcome = cli
                .invoke(
                    &["target", "-o", &org, "-s", &space],
                    None,
                    &mut |line: &str| tracing::debug!(target: "cf", "{line}"),
                )
                .await;
            cli_result(outcome)
        })
        .await?;

        progress("Running cf push");
        let app_name = deployment.app_name().to_string();
        let output_dir = deployment.output_dir().to_path_buf();
        self.step("cf push", limit, async {
            let mut forward = |line: &str| {
                tracing::info!(target: "cf", "{line}");
                progress(line);
            };
            let outcome = cli
                .invoke(&["push", &app_name], Some(&output_dir), &mut forward)
                .await;
            cli_result(outcome)
        })
        .await
    }

    async fn step<T, F>(&self, step: &'static str, limit: Duration, fut: F) -> Result<T, DeployError>
    where
        F: Future<Output = Result<T, DeployError>>,
    {
        tracing::debug!(step, "deployment step starting");
        self.cancel.guard(step, limit, fut).await
    }
}

fn cli_result(outcome: crate::cf_cli::CommandOutcome) -> Result<(), DeployError> {
    if outcome.succeeded {
        Ok(())
    } else {
        Err(DeployError::Cli(
            outcome
                .explanation
                .unwrap_or_else(|| "cf command failed".to_string()),
        ))
    }
}

// Polling may legitimately run for interval * attempts, so the step limit
// is added on top of that budget.
fn staging_limit(step_timeout: Duration, interval: Duration, attempts: u32) -> Duration {
    step_timeout.saturating_add(interval.saturating_mul(attempts))
}
