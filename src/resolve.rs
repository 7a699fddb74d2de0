//! The resolution engine.
//!
//! A [Container] owns a registry of [ServiceConfig] entries, a cache of
//! shared instances and a reflection handle. Resolving an identifier walks
//! the constructor parameters reported by the reflector, recursively
//! resolving each dependency, while a resolution stack guards against
//! cycles.
//!
//! The registry is read-only while a resolution is in flight: identifiers
//! that were never registered are served through a synthesized bare
//! descriptor instead of being added to the registry.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock, Weak};

use thiserror::Error;
use tracing::{debug, trace};

use crate::config::{ContainerConfig, ServiceConfig, Sharing};
use crate::reflect::{Argument, Instance, ParamSpec, Reflect};

/// Strip leading namespace separators from an identifier.
pub(crate) fn normalize(id: &str) -> &str {
    id.trim_start_matches(':')
}

/// Errors raised during registration, descriptor construction or resolution.
#[derive(Error, Debug)]
pub enum ContainerError {
    /// A service name or alias is already taken in the registry.
    #[error("'{0}' is already defined")]
    AlreadyDefined(String),
    /// The service name is reserved for the container itself.
    #[error("the class '{0}' is reserved")]
    ReservedName(String),
    /// The alias is reserved for the container itself.
    #[error("the alias '{0}' is reserved")]
    ReservedAlias(String),
    /// Service names and aliases must not be empty.
    #[error("service names and aliases must not be empty")]
    EmptyName,
    /// The identifier matches no registered service and no known type.
    #[error("service '{0}' not found")]
    NotFound(String),
    /// A type depends on itself, directly or transitively.
    #[error("circular dependency detected while resolving '{0}'")]
    CircularDependency(String),
    /// No policy rule can satisfy a constructor parameter.
    #[error("cannot resolve parameter '{param}' of class '{class}'")]
    UnresolvableParameter { class: String, param: String },
    /// A resolved instance does not hold the requested type.
    #[error("'{0}' is not of the expected type")]
    TypeMismatch(String),
}

/// Maps service names to their configuration and aliases to service names.
#[derive(Default)]
struct Registry {
    services: HashMap<String, ServiceConfig>,
    aliases: HashMap<String, String>,
}

impl Registry {
    /// Registration is atomic: both maps are checked before either is touched.
    fn register(&mut self, config: ServiceConfig) -> Result<(), ContainerError> {
        if self.services.contains_key(config.class_name()) {
            return Err(ContainerError::AlreadyDefined(
                config.class_name().to_string(),
            ));
        }
        if let Some(alias) = config.alias() {
            if self.aliases.contains_key(alias) {
                return Err(ContainerError::AlreadyDefined(alias.to_string()));
            }
            self.aliases
                .insert(alias.to_string(), config.class_name().to_string());
        }
        self.services.insert(config.class_name().to_string(), config);
        Ok(())
    }

    /// Resolve `id` through the alias table first, then as a service name.
    fn lookup(&self, id: &str) -> Option<&ServiceConfig> {
        let name = self.aliases.get(id).map(String::as_str).unwrap_or(id);
        self.services.get(name)
    }

    fn contains(&self, id: &str) -> bool {
        self.lookup(id).is_some()
    }
}

/// Mutable resolution state, guarded by one lock per top-level call.
#[derive(Default)]
struct ResolveState {
    /// Shared instances keyed by service name. Never evicted.
    shared: HashMap<String, Instance>,
    /// Service names currently under construction, for cycle detection.
    stack: Vec<String>,
}

/// Runtime dependency-injection container.
///
/// Containers are handed out behind [Arc] so they can inject themselves as
/// a dependency and serve their own reserved identifiers.
pub struct Container {
    config: ContainerConfig,
    reflector: Arc<dyn Reflect>,
    registry: RwLock<Registry>,
    state: Mutex<ResolveState>,
    weak_self: Weak<Container>,
}

impl Container {
    /// Alias under which the container always resolves to itself.
    pub const SERVICE_ALIAS: &'static str = "ikebana_service_container";

    /// Canonical name of the container type itself.
    pub const TYPE_NAME: &'static str = "ikebana::Container";

    pub fn new(config: ContainerConfig, reflector: Arc<dyn Reflect>) -> Arc<Self> {
        Arc::new_cyclic(|weak| Self {
            config,
            reflector,
            registry: RwLock::new(Registry::default()),
            state: Mutex::new(ResolveState::default()),
            weak_self: weak.clone(),
        })
    }

    /// Create a container and register `services` in order.
    pub fn with_services(
        config: ContainerConfig,
        reflector: Arc<dyn Reflect>,
        services: impl IntoIterator<Item = ServiceConfig>,
    ) -> Result<Arc<Self>, ContainerError> {
        let container = Self::new(config, reflector);
        container.set_services_config(services)?;
        Ok(container)
    }

    /// Register one service. Fails with [ContainerError::AlreadyDefined] if
    /// the name or the alias is taken; on failure nothing is recorded.
    pub fn set_service_config(&self, config: ServiceConfig) -> Result<(), ContainerError> {
        debug!(
            service = config.class_name(),
            alias = config.alias(),
            "registering service"
        );
        self.registry.write().unwrap().register(config)
    }

    /// Register services in order, stopping at the first conflict.
    /// Entries registered before the conflict stay applied.
    pub fn set_services_config(
        &self,
        services: impl IntoIterator<Item = ServiceConfig>,
    ) -> Result<(), ContainerError> {
        for config in services {
            self.set_service_config(config)?;
        }
        Ok(())
    }

    /// Whether `id` names a registered service, one of its aliases, or the
    /// container itself.
    pub fn has(&self, id: &str) -> bool {
        let id = normalize(id);
        self.is_container_id(id) || self.registry.read().unwrap().contains(id)
    }

    /// Retrieve an instance by identifier: a service name, an alias, or a
    /// constructible type name that was never registered.
    pub fn get(&self, id: &str) -> Result<Instance, ContainerError> {
        let id = normalize(id);
        if self.is_container_id(id) {
            return Ok(self.self_handle());
        }
        let registry = self.registry.read().unwrap();
        let mut state = self.state.lock().unwrap();
        self.resolve(&registry, &mut state, id)
    }

    /// [get](Container::get), downcast to a concrete service type.
    pub fn get_as<T: Any + Send + Sync>(&self, id: &str) -> Result<Arc<T>, ContainerError> {
        self.get(id)?
            .downcast::<T>()
            .map_err(|_| ContainerError::TypeMismatch(normalize(id).to_string()))
    }

    fn is_container_id(&self, id: &str) -> bool {
        id == Self::SERVICE_ALIAS || id == Self::TYPE_NAME
    }

    fn self_handle(&self) -> Instance {
        // The constructors only hand the container out behind its Arc, so
        // the weak handle is live for as long as `&self` can exist.
        let this = self.weak_self.upgrade().expect("container outlived its Arc");
        this as Instance
    }

    /// Recursive core of [get](Container::get). The stack entry pushed here
    /// is popped on every exit path, so a failed call never poisons later
    /// ones.
    fn resolve(
        &self,
        registry: &Registry,
        state: &mut ResolveState,
        id: &str,
    ) -> Result<Instance, ContainerError> {
        let id = normalize(id);
        if self.is_container_id(id) {
            return Ok(self.self_handle());
        }
        let service = registry
            .lookup(id)
            .cloned()
            .unwrap_or_else(|| ServiceConfig::bare(id));
        let name = service.class_name().to_string();
        if state.stack.contains(&name) {
            return Err(ContainerError::CircularDependency(name));
        }
        state.stack.push(name);
        let built = self.build(registry, state, &service);
        state.stack.pop();
        built
    }

    fn build(
        &self,
        registry: &Registry,
        state: &mut ResolveState,
        service: &ServiceConfig,
    ) -> Result<Instance, ContainerError> {
        let name = service.class_name();
        let shared = match service.sharing() {
            Sharing::Inherit => self.config.all_shared_by_default,
            Sharing::Shared => true,
            Sharing::Transient => false,
        };

        if shared {
            if let Some(existing) = state.shared.get(name) {
                trace!(service = name, "reusing shared instance");
                return Ok(Arc::clone(existing));
            }
        }

        let params = self
            .reflector
            .parameters_of(name)
            .ok_or_else(|| ContainerError::NotFound(name.to_string()))?;
        let mut args = Vec::with_capacity(params.len());
        for param in &params {
            args.push(self.resolve_parameter(registry, state, name, param)?);
        }
        let instance = self.reflector.instantiate(name, args)?;
        trace!(service = name, "constructed instance");

        // A failed construction must never reach the cache.
        if shared {
            state.shared.insert(name.to_string(), Arc::clone(&instance));
        }
        Ok(instance)
    }

    /// First match wins: declared default, injected absence, then the
    /// declared type resolved through the container.
    fn resolve_parameter(
        &self,
        registry: &Registry,
        state: &mut ResolveState,
        class: &str,
        param: &ParamSpec,
    ) -> Result<Argument, ContainerError> {
        if let Some(default) = param.default() {
            return Ok(Argument::Value(Arc::clone(default)));
        }
        if param.is_nullable() && self.config.inject_none_for_optional {
            return Ok(Argument::Absent);
        }
        if let Some(type_name) = param.type_name() {
            return self.resolve(registry, state, type_name).map(Argument::Value);
        }
        Err(ContainerError::UnresolvableParameter {
            class: class.to_string(),
            param: param.name().to_string(),
        })
    }
}
