// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Creates cfkit.yml template files.

use std::path::Path;

use crate::api::parse_target;
use crate::error::{Error, Result};

use super::CONFIG_FILENAME;

const DEFAULT_TARGET: &str = "https://api.sys.example.com";

pub fn init_config(
    dir: &Path,
    target: Option<&str>,
    app_name: Option<&str>,
    force: bool,
) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let target = target.unwrap_or(DEFAULT_TARGET);
    parse_target(target).map_err(|e| Error::InvalidConfig(e.to_string()))?;

    let app_name = app_name.unwrap_or("my-app");
    if app_name.trim().is_empty() {
        return Err(Error::InvalidConfig("app name cannot be empty".to_string()));
    }

    std::fs::write(&config_path, generate_template_yaml(target, app_name))?;

    Ok(())
}

fn generate_template_yaml(target: &str, app_name: &str) -> String {
    format!(
        r#"target: {target}
username: admin
password:
  env: CF_PASSWORD
# transport:
#   skip_ssl_validation: false
#   request_timeout: 60s
deploy:
  strategy: rest
  build_poll_interval: 2s
  step_timeout: 5m
app:
  name: {app_name}
  path: ./dist
  org: my-org
  space: dev
  # route:
  #   domain_guid: 00000000-0000-0000-0000-000000000000
  #   host: {app_name}
"#
    )
}
