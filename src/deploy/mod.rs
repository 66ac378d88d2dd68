// ABOUTME: Deployment orchestration using the type state pattern.
// ABOUTME: Exports state markers, the Deployment struct, and the push orchestrator.

mod cancel;
mod deployment;
mod error;
mod orchestrator;
mod state;
mod strategy;
mod transitions;

pub use cancel::CancelToken;
pub use deployment::{DeployRequest, DeployTarget, Deployment, RouteSpec};
pub use error::{DeployError, DeployErrorKind};
pub use orchestrator::{DeployOutcome, Orchestrator};
pub use state::{
    AppCreated, BitsPackaged, BitsUploaded, BuildCreated, BuildStaged, DropletAssigned,
    Initialized, PackageCreated, RouteBound, Started, Targeted,
};
pub use strategy::DeployStrategy;
