//! Runtime dependency-injection container with named services, aliasing,
//! shared-instance caching and circular-dependency detection.
//!
//! # Simple use case
//!
//! ```
//! # use std::sync::Arc;
//! # use ikebana::*;
//! // Constructible types declare their constructor shape
//! #[derive(Default)]
//! struct Database;
//! construct_default!(Database);
//!
//! struct UserService {
//!     db: Arc<Database>,
//! }
//!
//! impl Construct for UserService {
//!     fn parameters() -> Vec<ParamSpec> {
//!         vec![ParamSpec::class("db", "app::Database")]
//!     }
//!     fn construct(mut args: Arguments) -> Result<Self, ContainerError> {
//!         Ok(Self { db: args.take("db")? })
//!     }
//! }
//!
//! # fn main() -> Result<(), ContainerError> {
//! // Collect the declarations in a catalog, then register and resolve
//! let mut catalog = TypeCatalog::new();
//! catalog.declare::<Database>("app::Database");
//! catalog.declare::<UserService>("app::UserService");
//!
//! let container = Container::new(ContainerConfig::default(), Arc::new(catalog));
//! container.set_service_config(ServiceConfig::new("app::UserService")?.with_alias("users")?)?;
//!
//! let users: Arc<UserService> = container.get_as("users")?;
//! # let _ = users;
//! # Ok(())
//! # }
//! ```
//!
//! # Mechanism
//!
//! The container keeps three maps: a registry of [ServiceConfig] entries
//! (one per registered service name, plus an alias table), a cache of shared
//! instances, and the resolution stack of the in-flight call.
//!
//! To resolve an identifier, the container looks up its descriptor (or
//! synthesizes a transient one for identifiers that were never registered),
//! then asks the reflection boundary for the constructor parameters of the
//! target type and resolves each one in turn: a declared default wins, then
//! an injected absence for nullable parameters, then the declared type is
//! resolved recursively. The resolution stack detects cycles before any
//! caching comes into play.
//!
//! Rust has no runtime constructor reflection, so the reflection boundary is
//! the [Reflect] trait: the stock [TypeCatalog] implementation collects
//! explicit schemas declared through [Construct], and anything else that can
//! enumerate parameters and build instances can replace it.

mod config;
mod global;
mod reflect;
mod resolve;

pub use config::{ContainerConfig, ServiceConfig, Sharing};
pub use global::{global, global_init};
pub use reflect::{Argument, Arguments, Construct, Instance, ParamSpec, Reflect, TypeCatalog};
pub use resolve::{Container, ContainerError};
