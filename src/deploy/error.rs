// ABOUTME: Error types for deployment operations.
// ABOUTME: Covers precondition, packaging, platform, staging, CLI, cancellation, and timeout failures.

use crate::api::ApiError;
use crate::archive::ArchiveError;

/// Errors that can occur during deployment state transitions.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("App name not specified")]
    AppNameMissing,

    #[error("Target not specified")]
    TargetMissing,

    #[error("Org not specified")]
    OrgMissing,

    #[error("Space not specified")]
    SpaceMissing,

    #[error("Space does not belong to org")]
    SpaceNotInOrg,

    /// Build output could not be packaged.
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error("packaging build output was aborted: {0}")]
    PackagingAborted(String),

    /// A platform call failed; the cause carries the status or transport error.
    #[error("{step} failed")]
    Platform {
        step: &'static str,
        #[source]
        source: ApiError,
    },

    /// The platform answered but did not confirm the step.
    #[error("{step} failed: {reason}")]
    NotConfirmed { step: &'static str, reason: String },

    #[error("build failed: {0}")]
    BuildFailed(String),

    #[error("build did not finish staging after {0} polls")]
    StagingTimeout(u32),

    #[error("staged build {0} has no droplet")]
    MissingDroplet(String),

    /// A cf CLI command failed.
    #[error("{0}")]
    Cli(String),

    #[error("Deployment cancelled")]
    Cancelled,

    #[error("{step} timed out after {seconds} seconds")]
    StepTimeout { step: &'static str, seconds: f64 },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    /// A required input was missing or inconsistent. No request was made.
    Precondition,
    Packaging,
    Platform,
    Staging,
    Cli,
    Cancelled,
    Timeout,
}

impl DeployError {
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::AppNameMissing
            | DeployError::TargetMissing
            | DeployError::OrgMissing
            | DeployError::SpaceMissing
            | DeployError::SpaceNotInOrg => DeployErrorKind::Precondition,
            DeployError::Archive(_) | DeployError::PackagingAborted(_) => {
                DeployErrorKind::Packaging
            }
            DeployError::Platform { .. } | DeployError::NotConfirmed { .. } => {
                DeployErrorKind::Platform
            }
            DeployError::BuildFailed(_)
            | DeployError::StagingTimeout(_)
            | DeployError::MissingDroplet(_) => DeployErrorKind::Staging,
            DeployError::Cli(_) => DeployErrorKind::Cli,
            DeployError::Cancelled => DeployErrorKind::Cancelled,
            DeployError::StepTimeout { .. } => DeployErrorKind::Timeout,
        }
    }

    pub(crate) fn platform(step: &'static str) -> impl FnOnce(ApiError) -> Self {
        move |source| DeployError::Platform { step, source }
    }
}
