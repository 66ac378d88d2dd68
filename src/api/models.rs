// ABOUTME: Wire-level JSON shapes for the v3 platform API.
// ABOUTME: Resources, pagination envelopes, token response, and request bodies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{
    AppGuid, AppState, BuildGuid, DomainGuid, DropletGuid, Guid, OrgGuid, PackageGuid, RouteGuid,
    SpaceGuid,
};

/// Opaque link to another resource or page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Href {
    pub href: String,
}

// =============================================================================
// Platform root
// =============================================================================

/// Body of `GET /` on the platform API.
#[derive(Debug, Clone, Deserialize)]
pub struct RootInfo {
    pub links: RootLinks,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RootLinks {
    #[serde(default)]
    pub login: Option<Href>,
}

/// Body of a successful token grant.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

// =============================================================================
// Pagination
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub total_results: Option<u32>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub first: Option<Href>,
    #[serde(default)]
    pub last: Option<Href>,
    /// `None` on the last page.
    #[serde(default)]
    pub next: Option<Href>,
    #[serde(default)]
    pub previous: Option<Href>,
}

/// One page of a listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourcePage<R> {
    #[serde(default)]
    pub pagination: Pagination,
    #[serde(default = "Vec::new")]
    pub resources: Vec<R>,
}

// =============================================================================
// Resources
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct OrgResource {
    pub guid: OrgGuid,
    pub name: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpaceResource {
    pub guid: SpaceGuid,
    pub name: String,
    #[serde(default)]
    pub relationships: Option<SpaceRelationships>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpaceRelationships {
    pub organization: Relationship<OrgGuid>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppResource {
    pub guid: AppGuid,
    pub name: String,
    pub state: AppState,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PackageResource {
    pub guid: PackageGuid,
    #[serde(rename = "type")]
    pub kind: String,
    pub state: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BuildResource {
    pub guid: BuildGuid,
    pub state: String,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub droplet: Option<GuidRef<DropletGuid>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl BuildResource {
    pub const STAGING: &'static str = "STAGING";
    pub const STAGED: &'static str = "STAGED";
    pub const FAILED: &'static str = "FAILED";

    /// Whether staging has finished, successfully or not.
    pub fn is_terminal(&self) -> bool {
        self.state == Self::STAGED || self.state == Self::FAILED
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteResource {
    pub guid: RouteGuid,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub destinations: Vec<RouteDestination>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteDestination {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
    pub app: DestinationApp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestinationApp {
    pub guid: AppGuid,
    pub process: ProcessRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessRef {
    #[serde(rename = "type")]
    pub kind: String,
}

// =============================================================================
// Relationships
// =============================================================================

/// `{ "guid": "..." }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuidRef<G> {
    pub guid: G,
}

/// `{ "data": { "guid": "..." } }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship<G> {
    pub data: GuidRef<G>,
}

impl<T> Relationship<Guid<T>> {
    pub fn to(guid: &Guid<T>) -> Self {
        Relationship {
            data: GuidRef { guid: guid.clone() },
        }
    }
}

// =============================================================================
// Request bodies
// =============================================================================

#[derive(Debug, Serialize)]
pub struct CreateAppRequest<'a> {
    pub name: &'a str,
    pub relationships: SpaceRelationship,
}

#[derive(Debug, Serialize)]
pub struct SpaceRelationship {
    pub space: Relationship<SpaceGuid>,
}

#[derive(Debug, Serialize)]
pub struct CreatePackageRequest {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub relationships: AppRelationship,
}

#[derive(Debug, Serialize)]
pub struct AppRelationship {
    pub app: Relationship<AppGuid>,
}

#[derive(Debug, Serialize)]
pub struct CreateBuildRequest {
    pub package: GuidRef<PackageGuid>,
}

pub type SetDropletRequest = Relationship<DropletGuid>;

#[derive(Debug, Serialize)]
pub struct CreateRouteRequest<'a> {
    pub host: &'a str,
    pub path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    pub relationships: RouteRelationships,
}

#[derive(Debug, Serialize)]
pub struct RouteRelationships {
    pub domain: Relationship<DomainGuid>,
    pub space: Relationship<SpaceGuid>,
}

#[derive(Debug, Serialize)]
pub struct AddDestinationsRequest {
    pub destinations: Vec<RouteDestination>,
}
