// ABOUTME: Lifecycle state of an app as reported by the platform.
// ABOUTME: Known states are typed; anything else is preserved verbatim.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum AppState {
    Started,
    #[default]
    Stopped,
    Deleted,
    /// A state string this client does not model.
    Other(String),
}

impl AppState {
    pub fn as_str(&self) -> &str {
        match self {
            AppState::Started => "STARTED",
            AppState::Stopped => "STOPPED",
            AppState::Deleted => "DELETED",
            AppState::Other(s) => s,
        }
    }
}

impl From<&str> for AppState {
    fn from(value: &str) -> Self {
        match value {
            "STARTED" => AppState::Started,
            "STOPPED" => AppState::Stopped,
            "DELETED" => AppState::Deleted,
            other => AppState::Other(other.to_string()),
        }
    }
}

impl fmt::Display for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AppState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AppState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(AppState::from(s.as_str()))
    }
}
