// ABOUTME: Deployment state marker types for the type state pattern.
// ABOUTME: Each state carries the identifiers earlier steps produced.

use crate::types::{AppGuid, BuildGuid, DropletGuid, PackageGuid, RouteGuid};

/// Preconditions checked, nothing sent yet.
/// Available actions: `target()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Initialized;

/// Org and space selected and consistent.
/// Available actions: `package_bits()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Targeted;

/// Build output zipped in memory.
/// Available actions: `create_app()`
#[derive(Debug, Clone)]
pub struct BitsPackaged {
    pub(crate) bits: Vec<u8>,
}

/// App exists on the platform.
/// Available actions: `create_package()`
#[derive(Debug, Clone)]
pub struct AppCreated {
    pub(crate) bits: Vec<u8>,
    pub(crate) app: AppGuid,
}

/// Empty bits package exists for the app.
/// Available actions: `upload_bits()`
#[derive(Debug, Clone)]
pub struct PackageCreated {
    pub(crate) bits: Vec<u8>,
    pub(crate) app: AppGuid,
    pub(crate) package: PackageGuid,
}

/// Archive uploaded into the package.
/// Available actions: `create_build()`
#[derive(Debug, Clone)]
pub struct BitsUploaded {
    pub(crate) app: AppGuid,
    pub(crate) package: PackageGuid,
}

/// Staging requested.
/// Available actions: `wait_for_staging()`
#[derive(Debug, Clone)]
pub struct BuildCreated {
    pub(crate) app: AppGuid,
    pub(crate) build: BuildGuid,
}

/// Staging finished with a droplet.
/// Available actions: `assign_droplet()`
#[derive(Debug, Clone)]
pub struct BuildStaged {
    pub(crate) app: AppGuid,
    pub(crate) droplet: DropletGuid,
}

/// App points at the new droplet.
/// Available actions: `bind_route()`
#[derive(Debug, Clone)]
pub struct DropletAssigned {
    pub(crate) app: AppGuid,
}

/// Route created and mapped, or skipped when none was requested.
/// Available actions: `start()`
#[derive(Debug, Clone)]
pub struct RouteBound {
    pub(crate) app: AppGuid,
    pub(crate) route: Option<RouteGuid>,
}

/// Terminal success: the platform reports the app started.
#[derive(Debug, Clone)]
pub struct Started {
    pub(crate) app: AppGuid,
    pub(crate) route: Option<RouteGuid>,
}
