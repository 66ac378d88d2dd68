// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Uses phantom types to prevent GUID confusion at compile time.

mod app_state;
mod id;
mod route_host;

pub use app_state::AppState;
pub use id::{
    AppGuid, BuildGuid, DomainGuid, DropletGuid, Guid, OrgGuid, PackageGuid, RouteGuid, SpaceGuid,
};
pub use route_host::{RouteHost, RouteHostError};
