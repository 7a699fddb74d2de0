//! Container-wide and per-service configuration.
//!
//! [ServiceConfig] values are validated when they are built, before they can
//! ever reach a container, so a registry never holds a reserved or empty
//! name.

use crate::resolve::{normalize, Container, ContainerError};

/// Controls whether resolved instances of a service are cached and reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sharing {
    /// Follow the container-wide default.
    #[default]
    Inherit,
    /// One cached instance per service name, reused on every resolution.
    Shared,
    /// A fresh instance on every resolution.
    Transient,
}

/// Container-wide resolution defaults, fixed at construction.
#[derive(Debug, Clone, Copy)]
pub struct ContainerConfig {
    /// Cache and reuse instances of services that leave [Sharing::Inherit].
    pub all_shared_by_default: bool,
    /// Inject an absent value for nullable parameters without a default.
    pub inject_none_for_optional: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            all_shared_by_default: false,
            inject_none_for_optional: true,
        }
    }
}

/// Describes how one named service should be built.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    class_name: String,
    alias: Option<String>,
    sharing: Sharing,
}

impl ServiceConfig {
    /// Create a descriptor for `class_name`.
    ///
    /// The name is normalized (leading `::` separators stripped) and must be
    /// non-empty and not reserved for the container itself.
    pub fn new(class_name: &str) -> Result<Self, ContainerError> {
        let class_name = normalize(class_name);
        if class_name.is_empty() {
            return Err(ContainerError::EmptyName);
        }
        if class_name == Container::TYPE_NAME {
            return Err(ContainerError::ReservedName(class_name.to_string()));
        }
        Ok(Self {
            class_name: class_name.to_string(),
            alias: None,
            sharing: Sharing::Inherit,
        })
    }

    /// Attach a secondary identifier under which the service also resolves.
    pub fn with_alias(mut self, alias: &str) -> Result<Self, ContainerError> {
        if alias.is_empty() {
            return Err(ContainerError::EmptyName);
        }
        if alias == Container::SERVICE_ALIAS {
            return Err(ContainerError::ReservedAlias(alias.to_string()));
        }
        self.alias = Some(alias.to_string());
        Ok(self)
    }

    pub fn with_sharing(mut self, sharing: Sharing) -> Self {
        self.sharing = sharing;
        self
    }

    /// Descriptor synthesized for an identifier that was never registered.
    /// Skips validation: the reserved identifiers are intercepted before the
    /// registry is consulted, and an unknown name fails later anyway.
    pub(crate) fn bare(class_name: &str) -> Self {
        Self {
            class_name: class_name.to_string(),
            alias: None,
            sharing: Sharing::Inherit,
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn sharing(&self) -> Sharing {
        self.sharing
    }
}
