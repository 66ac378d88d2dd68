// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Validates route host labels while parsing.

use serde::Deserialize;

use crate::types::RouteHost;

pub fn deserialize_route_host<'de, D>(deserializer: D) -> Result<RouteHost, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    RouteHost::new(&s).map_err(serde::de::Error::custom)
}
