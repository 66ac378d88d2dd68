// ABOUTME: Deployment strategy selection.
// ABOUTME: Chooses between driving the REST API directly and shelling out to the cf CLI.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// How an app is pushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeployStrategy {
    /// Create app, package, build, droplet, and route through the v3 API.
    #[default]
    Rest,

    /// Run `cf target` and `cf push` with an installed cf CLI.
    Cli,
}

impl DeployStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeployStrategy::Rest => "rest",
            DeployStrategy::Cli => "cli",
        }
    }
}

impl fmt::Display for DeployStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeployStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rest" => Ok(DeployStrategy::Rest),
            "cli" => Ok(DeployStrategy::Cli),
            other => Err(format!("unknown deploy strategy '{other}' (expected rest or cli)")),
        }
    }
}
