// ABOUTME: Deployment settings: strategy, build polling, and per-step time limit.
// ABOUTME: Durations use humantime strings such as "2s" or "5m".

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::deploy::DeployStrategy;

#[derive(Debug, Clone, Deserialize)]
pub struct DeploySettings {
    #[serde(default)]
    pub strategy: DeployStrategy,

    #[serde(default = "default_build_poll_interval", with = "humantime_serde")]
    pub build_poll_interval: Duration,

    #[serde(default = "default_build_poll_attempts")]
    pub build_poll_attempts: u32,

    #[serde(default = "default_step_timeout", with = "humantime_serde")]
    pub step_timeout: Duration,

    /// Location of the cf executable for the CLI strategy. Searched on PATH if unset.
    #[serde(default)]
    pub cf_path: Option<PathBuf>,
}

fn default_build_poll_interval() -> Duration {
    Duration::from_secs(2)
}

fn default_build_poll_attempts() -> u32 {
    150
}

fn default_step_timeout() -> Duration {
    Duration::from_secs(300)
}

impl Default for DeploySettings {
    fn default() -> Self {
        Self {
            strategy: DeployStrategy::default(),
            build_poll_interval: default_build_poll_interval(),
            build_poll_attempts: default_build_poll_attempts(),
            step_timeout: default_step_timeout(),
            cf_path: None,
        }
    }
}
