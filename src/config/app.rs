// ABOUTME: The app to push: name, build output path, org, space, and optional route.
// ABOUTME: Converts the route block into the deployment's route request.

use serde::Deserialize;
use std::path::PathBuf;

use super::deserialize::deserialize_route_host;
use crate::deploy::RouteSpec;
use crate::types::{DomainGuid, RouteHost};

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub name: String,

    /// Build output directory, relative to the config file's directory.
    #[serde(default = "default_path")]
    pub path: PathBuf,

    pub org: String,

    pub space: String,

    #[serde(default)]
    pub route: Option<RouteConfig>,
}

fn default_path() -> PathBuf {
    PathBuf::from(".")
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteConfig {
    pub domain_guid: DomainGuid,

    #[serde(deserialize_with = "deserialize_route_host")]
    pub host: RouteHost,

    #[serde(default)]
    pub path: String,

    #[serde(default)]
    pub port: Option<u16>,

    #[serde(default = "default_process_type")]
    pub process_type: String,

    #[serde(default = "default_destination_port")]
    pub destination_port: Option<u16>,
}

fn default_process_type() -> String {
    "web".to_string()
}

fn default_destination_port() -> Option<u16> {
    Some(8080)
}

impl RouteConfig {
    pub fn to_spec(&self) -> RouteSpec {
        RouteSpec {
            domain: self.domain_guid.clone(),
            host: self.host.clone(),
            path: self.path.clone(),
            port: self.port,
            process_type: self.process_type.clone(),
            destination_port: self.destination_port,
        }
    }
}
