// ABOUTME: Domain model for platform resources and registered instances.
// ABOUTME: Built bottom-up from wire resources by the service layer.

mod hierarchy;
mod registry;

pub use hierarchy::{App, Instance, Organization, Space};
pub use registry::{InstanceRegistry, RegistryError};
