// ABOUTME: Domain hierarchy Instance -> Organization -> Space -> App.
// ABOUTME: Children hold shared handles to their parent; identity is by key, not by pointer.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::api::models::{AppResource, OrgResource, SpaceResource};
use crate::types::{AppGuid, AppState, OrgGuid, SpaceGuid};

/// A registered platform endpoint and the token used for everything beneath it.
pub struct Instance {
    name: String,
    api_address: String,
    access_token: RwLock<String>,
}

impl Instance {
    pub fn new(
        name: impl Into<String>,
        api_address: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            api_address: api_address.into(),
            access_token: RwLock::new(access_token.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn api_address(&self) -> &str {
        &self.api_address
    }

    pub fn access_token(&self) -> String {
        self.access_token.read().clone()
    }

    /// Replace the token after a re-login.
    pub fn set_access_token(&self, token: impl Into<String>) {
        *self.access_token.write() = token.into();
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("name", &self.name)
            .field("api_address", &self.api_address)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Instance {}

#[derive(Debug, Clone)]
pub struct Organization {
    pub name: String,
    pub guid: OrgGuid,
    pub parent: Arc<Instance>,
}

impl Organization {
    pub fn from_resource(resource: OrgResource, parent: Arc<Instance>) -> Self {
        Self {
            name: resource.name,
            guid: resource.guid,
            parent,
        }
    }

    pub fn instance(&self) -> &Instance {
        &self.parent
    }
}

impl PartialEq for Organization {
    fn eq(&self, other: &Self) -> bool {
        self.guid == other.guid
    }
}

impl Eq for Organization {}

#[derive(Debug, Clone)]
pub struct Space {
    pub name: String,
    pub guid: SpaceGuid,
    pub parent: Arc<Organization>,
}

impl Space {
    pub fn from_resource(resource: SpaceResource, parent: Arc<Organization>) -> Self {
        Self {
            name: resource.name,
            guid: resource.guid,
            parent,
        }
    }

    pub fn organization(&self) -> &Organization {
        &self.parent
    }

    pub fn instance(&self) -> &Instance {
        self.parent.instance()
    }
}

impl PartialEq for Space {
    fn eq(&self, other: &Self) -> bool {
        self.guid == other.guid
    }
}

impl Eq for Space {}

/// A deployable unit. `state` only changes once the platform confirms it.
#[derive(Debug, Clone)]
pub struct App {
    pub name: String,
    pub guid: AppGuid,
    pub parent: Arc<Space>,
    pub state: AppState,
}

impl App {
    pub fn from_resource(resource: AppResource, parent: Arc<Space>) -> Self {
        Self {
            name: resource.name,
            guid: resource.guid,
            parent,
            state: resource.state,
        }
    }

    pub fn space(&self) -> &Space {
        &self.parent
    }

    pub fn instance(&self) -> &Instance {
        self.parent.instance()
    }
}

impl PartialEq for App {
    fn eq(&self, other: &Self) -> bool {
        self.guid == other.guid
    }
}

impl Eq for App {}

#[cfg(test)]
mod tests {
    use super::*;

    fn space() -> Arc<Space> {
        let instance = Arc::new(Instance::new("dev", "https://api.example.com", "token-1"));
        let org = Arc::new(Organization {
            name: "acme".to_string(),
            guid: OrgGuid::new("org-1"),
            parent: instance,
        });
        Arc::new(Space {
            name: "staging".to_string(),
            guid: SpaceGuid::new("space-1"),
            parent: org,
        })
    }

    #[test]
    fn app_reaches_instance_through_parents() {
        let app = App {
            name: "web".to_string(),
            guid: AppGuid::new("app-1"),
            parent: space(),
            state: AppState::Stopped,
        };

        assert_eq!(app.space().name, "staging");
        assert_eq!(app.space().organization().name, "acme");
        assert_eq!(app.instance().api_address(), "https://api.example.com");
    }

    #[test]
    fn orgs_compare_by_guid() {
        let a = Organization {
            name: "acme".to_string(),
            guid: OrgGuid::new("org-1"),
            parent: Arc::new(Instance::new("dev", "https://a.example.com", "")),
        };
        let b = Organization {
            name: "renamed".to_string(),
            guid: OrgGuid::new("org-1"),
            parent: Arc::new(Instance::new("prod", "https://b.example.com", "")),
        };
        assert_eq!(a, b);
    }

    #[test]
    fn token_refresh_is_visible_to_descendants() {
        let space = space();
        space.instance().set_access_token("token-2");
        assert_eq!(space.organization().instance().access_token(), "token-2");
    }

    #[test]
    fn debug_hides_token() {
        let instance = Instance::new("dev", "https://api.example.com", "secret-token");
        assert!(!format!("{instance:?}").contains("secret-token"));
    }
}
