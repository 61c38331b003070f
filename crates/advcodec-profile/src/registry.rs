use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use tracing::debug;

use crate::catalog;
use crate::config::RegistryConfig;
use crate::error::{ProfileError, Result};
use crate::profile::Profile;

static BUILTIN: Lazy<ProfileRegistry> = Lazy::new(|| {
    catalog::profiles()
        .and_then(ProfileRegistry::from_profiles)
        .unwrap_or_else(|err| panic!("built-in profile catalog is invalid: {err}"))
});

/// Ordered, name-indexed collection of profiles.
///
/// Lookups that can match several profiles return the first one in
/// registration order.
pub struct ProfileRegistry {
    profiles: Vec<Arc<Profile>>,
    by_name: HashMap<String, usize>,
    config: RegistryConfig,
}

impl ProfileRegistry {
    /// Create an empty registry with default config.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create an empty registry with explicit config.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            profiles: Vec::new(),
            by_name: HashMap::new(),
            config,
        }
    }

    /// The built-in catalog, constructed on first use.
    pub fn builtin() -> &'static ProfileRegistry {
        &BUILTIN
    }

    /// Build a registry from profiles in the given order.
    pub fn from_profiles(profiles: impl IntoIterator<Item = Profile>) -> Result<Self> {
        let mut registry = Self::new();
        for profile in profiles {
            registry.register(profile)?;
        }
        Ok(registry)
    }

    /// Register a profile after the existing ones.
    pub fn register(&mut self, profile: Profile) -> Result<()> {
        if self.by_name.contains_key(profile.name()) {
            return Err(ProfileError::DuplicateProfile(profile.name().to_string()));
        }
        if self.config.validate_formats {
            profile.validate()?;
        }

        debug!(
            profile = profile.name(),
            identifier = profile.identifier(),
            "registered profile"
        );
        self.by_name
            .insert(profile.name().to_string(), self.profiles.len());
        self.profiles.push(Arc::new(profile));
        Ok(())
    }

    /// Find a profile by its exact name.
    pub fn find_by_name(&self, name: &str) -> Option<&Profile> {
        self.shared(name).map(Arc::as_ref)
    }

    /// Like [`find_by_name`](Self::find_by_name), failing for unknown names.
    pub fn get(&self, name: &str) -> Result<&Profile> {
        self.find_by_name(name)
            .ok_or_else(|| ProfileError::UnknownProfile(name.to_string()))
    }

    /// Find the first profile advertising this service identifier.
    pub fn find_by_service_id(&self, service_id: &str) -> Option<&Profile> {
        self.iter().find(|profile| profile.has_service_id(service_id))
    }

    /// Find the first profile whose pattern occurs in the observed device name.
    pub fn find_by_device_name(&self, observed_name: &str) -> Option<&Profile> {
        self.iter()
            .find(|profile| profile.matches_device_name(observed_name))
    }

    /// Find the first profile whose primary format uses this identifier.
    pub fn find_by_identifier(&self, identifier: u16) -> Option<&Profile> {
        self.iter()
            .find(|profile| profile.identifier() == identifier)
    }

    /// Pick a profile for an advertisement: device name first, then each
    /// service identifier in the order given.
    pub fn resolve(&self, device_name: Option<&str>, service_ids: &[&str]) -> Option<&Profile> {
        device_name
            .and_then(|name| self.find_by_device_name(name))
            .or_else(|| {
                service_ids
                    .iter()
                    .find_map(|service_id| self.find_by_service_id(service_id))
            })
    }

    /// Profiles in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.iter().map(Arc::as_ref)
    }

    /// Profile names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.iter().map(Profile::name).collect()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Get registry configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub(crate) fn shared(&self, name: &str) -> Option<&Arc<Profile>> {
        self.by_name.get(name).map(|&index| &self.profiles[index])
    }
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::new()
    }
}
