// ABOUTME: Named registry of platform instances.
// ABOUTME: Names are unique keys; inserting an existing name is rejected, never overwritten.

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;

use super::hierarchy::Instance;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("The name {0} already exists.")]
    DuplicateName(String),

    #[error("no instance named {0}")]
    UnknownName(String),
}

/// Instances keyed by name, with an optional active selection.
#[derive(Debug, Default)]
pub struct InstanceRegistry {
    instances: BTreeMap<String, Arc<Instance>>,
    active: Option<String>,
}

impl InstanceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an instance under its own name.
    ///
    /// # Errors
    ///
    /// `RegistryError::DuplicateName` if the name is taken; the existing
    /// entry is left untouched.
    pub fn add_instance(&mut self, instance: Instance) -> Result<Arc<Instance>, RegistryError> {
        let name = instance.name().to_string();
        if self.instances.contains_key(&name) {
            tracing::debug!(%name, "rejected duplicate instance name");
            return Err(RegistryError::DuplicateName(name));
        }

        let instance = Arc::new(instance);
        self.instances.insert(name, Arc::clone(&instance));
        Ok(instance)
    }

    pub fn get(&self, name: &str) -> Option<Arc<Instance>> {
        self.instances.get(name).cloned()
    }

    pub fn remove(&mut self, name: &str) -> Option<Arc<Instance>> {
        if self.active.as_deref() == Some(name) {
            self.active = None;
        }
        self.instances.remove(name)
    }

    pub fn set_active(&mut self, name: &str) -> Result<(), RegistryError> {
        if !self.instances.contains_key(name) {
            return Err(RegistryError::UnknownName(name.to_string()));
        }
        self.active = Some(name.to_string());
        Ok(())
    }

    pub fn active(&self) -> Option<Arc<Instance>> {
        self.active.as_deref().and_then(|name| self.get(name))
    }

    /// Names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.instances.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_name_is_rejected_and_original_kept() {
        let mut registry = InstanceRegistry::new();
        registry
            .add_instance(Instance::new("dev", "https://one.example.com", "t1"))
            .unwrap();

        let err = registry
            .add_instance(Instance::new("dev", "https://two.example.com", "t2"))
            .unwrap_err();

        assert_eq!(err, RegistryError::DuplicateName("dev".to_string()));
        assert_eq!(err.to_string(), "The name dev already exists.");
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get("dev").unwrap().api_address(),
            "https://one.example.com"
        );
    }

    #[test]
    fn active_instance_must_be_registered() {
        let mut registry = InstanceRegistry::new();
        assert!(registry.active().is_none());
        assert_eq!(
            registry.set_active("prod"),
            Err(RegistryError::UnknownName("prod".to_string()))
        );

        registry
            .add_instance(Instance::new("prod", "https://api.example.com", ""))
            .unwrap();
        registry.set_active("prod").unwrap();
        assert_eq!(registry.active().unwrap().name(), "prod");
    }

    #[test]
    fn removing_active_instance_clears_selection() {
        let mut registry = InstanceRegistry::new();
        registry
            .add_instance(Instance::new("dev", "https://api.example.com", ""))
            .unwrap();
        registry.set_active("dev").unwrap();

        assert!(registry.remove("dev").is_some());
        assert!(registry.active().is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn names_are_sorted() {
        let mut registry = InstanceRegistry::new();
        for name in ["prod", "dev", "staging"] {
            registry
                .add_instance(Instance::new(name, "https://api.example.com", ""))
                .unwrap();
        }
        assert_eq!(registry.names().collect::<Vec<_>>(), ["dev", "prod", "staging"]);
    }
}
