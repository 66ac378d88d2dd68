// ABOUTME: Fixed v3 resource path templates.
// ABOUTME: `:guid` placeholders are substituted per call.

pub const ORGANIZATIONS: &str = "/v3/organizations";
pub const SPACES: &str = "/v3/spaces";
pub const APPS: &str = "/v3/apps";
pub const APP: &str = "/v3/apps/:guid";
pub const START_APP: &str = "/v3/apps/:guid/actions/start";
pub const STOP_APP: &str = "/v3/apps/:guid/actions/stop";
pub const PACKAGES: &str = "/v3/packages";
pub const PACKAGE: &str = "/v3/packages/:guid";
pub const UPLOAD_PACKAGE: &str = "/v3/packages/:guid/upload";
pub const BUILDS: &str = "/v3/builds";
pub const BUILD: &str = "/v3/builds/:guid";
pub const CURRENT_DROPLET: &str = "/v3/apps/:guid/relationships/current_droplet";
pub const ROUTES: &str = "/v3/routes";
pub const ROUTE_DESTINATIONS: &str = "/v3/routes/:guid/destinations";
