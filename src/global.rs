//! Optional process-wide container handle.
//!
//! A single container instance for the whole process, created exactly once
//! under an explicit initialization guard. This is a convenience on top of
//! the core [Container], which stays fully usable without it.

use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::config::{ContainerConfig, ServiceConfig};
use crate::reflect::Reflect;
use crate::resolve::{Container, ContainerError};

static GLOBAL: OnceCell<Arc<Container>> = OnceCell::new();

/// Initialize the process-wide container.
///
/// The first call builds the container from its arguments; every later call
/// returns the already-initialized handle and ignores its arguments.
pub fn global_init(
    config: ContainerConfig,
    reflector: Arc<dyn Reflect>,
    services: impl IntoIterator<Item = ServiceConfig>,
) -> Result<&'static Arc<Container>, ContainerError> {
    GLOBAL.get_or_try_init(|| Container::with_services(config, reflector, services))
}

/// The process-wide container, if [global_init] has run.
pub fn global() -> Option<&'static Arc<Container>> {
    GLOBAL.get()
}
