// ABOUTME: Push command implementation.
// ABOUTME: Resolves the configured app target and runs the deployment orchestrator.

use std::path::Path;
use std::sync::Arc;

use cfkit::cf_cli::{CfCli, PathLocator, ProcessRunner};
use cfkit::config::{Config, RouteConfig};
use cfkit::deploy::{DeployRequest, DeployStrategy, Orchestrator};
use cfkit::error::{Error, Result};
use cfkit::output::Output;

use super::session;

pub async fn push(
    config: Config,
    strategy: Option<DeployStrategy>,
    cwd: &Path,
    output: &mut Output,
) -> Result<()> {
    let app = config
        .app
        .clone()
        .ok_or_else(|| Error::InvalidConfig("no app block in config".to_string()))?;

    output.start_timer();
    let session = session::connect(&config).await?;
    let org = session.find_org(&app.org).await?;
    let space = session.find_space(&org, &app.space).await?;

    let mut settings = config.deploy.clone();
    if let Some(strategy) = strategy {
        settings.strategy = strategy;
    }

    let output_dir = if app.path.is_absolute() {
        app.path.clone()
    } else {
        cwd.join(&app.path)
    };

    let request = DeployRequest {
        app_name: app.name.clone(),
        instance: Some(session.instance.clone()),
        org: Some(org),
        space: Some(space),
        output_dir,
        route: app.route.as_ref().map(RouteConfig::to_spec),
    };

    if let Some(warning) = ignored_route_warning(settings.strategy, app.route.as_ref()) {
        output.warning(warning);
    }

    let cli = CfCli::new(
        Arc::new(ProcessRunner),
        Arc::new(PathLocator::new(settings.cf_path.clone())),
    );
    output.progress(&format!("Pushing {} ({} strategy)", app.name, settings.strategy));
    let orchestrator = Orchestrator::new(session.service.client().clone(), settings).with_cli(cli);

    let cancel = orchestrator.cancel_token().clone();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let out: &Output = output;
    let outcome = orchestrator
        .deploy_with_progress(request, &mut |step: &str| out.progress(&format!("  → {step}")))
        .await;
    interrupt.abort();

    if outcome.succeeded {
        output.success(&format!("Pushed {}", app.name));
        Ok(())
    } else {
        Err(Error::OperationFailed(
            outcome
                .explanation
                .unwrap_or_else(|| "deployment failed".to_string()),
        ))
    }
}

/// `cf push` maps routes from its own manifest, so a configured route block
/// only applies to the REST strategy.
fn ignored_route_warning(
    strategy: DeployStrategy,
    route: Option<&RouteConfig>,
) -> Option<&'static str> {
    match (strategy, route) {
        (DeployStrategy::Cli, Some(_)) => {
            Some("route block is ignored by the cli strategy; cf push uses its manifest routes")
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route() -> RouteConfig {
        serde_yaml::from_str("domain_guid: d1\nhost: web\n").unwrap()
    }

    #[test]
    fn cli_strategy_warns_about_route_block() {
        let route = route();
        assert!(ignored_route_warning(DeployStrategy::Cli, Some(&route)).is_some());
    }

    #[test]
    fn rest_strategy_or_no_route_is_silent() {
        let route = route();
        assert_eq!(ignored_route_warning(DeployStrategy::Rest, Some(&route)), None);
        assert_eq!(ignored_route_warning(DeployStrategy::Cli, None), None);
    }
}
