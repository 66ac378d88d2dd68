// ABOUTME: Configuration types and parsing for cfkit.yml.
// ABOUTME: Handles YAML parsing, config discovery, and secret resolution.

mod app;
mod deploy;
mod deserialize;
mod env_value;
mod init;

pub use app::{AppConfig, RouteConfig};
pub use deploy::DeploySettings;
pub use env_value::EnvValue;
pub use init::init_config;

use crate::api::{ClientCredentials, TransportConfig, parse_target};
use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;

pub const CONFIG_FILENAME: &str = "cfkit.yml";
pub const CONFIG_FILENAME_ALT: &str = "cfkit.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".cfkit/config.yml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Cloud Controller root, e.g. `https://api.sys.example.com`.
    pub target: String,

    pub username: String,

    #[serde(default)]
    pub password: Option<EnvValue>,

    /// Name the connected instance is registered under. Defaults to the target host.
    #[serde(default)]
    pub instance_name: Option<String>,

    #[serde(default)]
    pub transport: TransportConfig,

    #[serde(default)]
    pub auth: ClientCredentials,

    #[serde(default)]
    pub deploy: DeploySettings,

    #[serde(default)]
    pub app: Option<AppConfig>,
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    fn validate(&self) -> Result<()> {
        parse_target(&self.target).map_err(|e| Error::InvalidConfig(e.to_string()))?;

        if self.username.trim().is_empty() {
            return Err(Error::InvalidConfig("username cannot be empty".to_string()));
        }

        if self.deploy.build_poll_attempts == 0 {
            return Err(Error::InvalidConfig(
                "deploy.build_poll_attempts must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Resolve the password, reading the environment if the config points there.
    pub fn password(&self) -> Result<String> {
        match &self.password {
            Some(value) => value.resolve(),
            None => Err(Error::InvalidConfig("password is not set".to_string())),
        }
    }

    /// The configured instance name, or the target's host.
    pub fn instance_name(&self) -> String {
        if let Some(name) = &self.instance_name {
            return name.clone();
        }
        parse_target(&self.target)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
            .unwrap_or_else(|| self.target.clone())
    }
}
