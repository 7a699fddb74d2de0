//! The reflection boundary: constructor metadata and instantiation.
//!
//! Rust has no runtime constructor reflection, so the container works from
//! explicit schemas instead. Each constructible type declares its parameter
//! list and a constructor through the [Construct] trait, and a [TypeCatalog]
//! collects these declarations under their service names. The resolution
//! engine only ever talks to the [Reflect] trait, so the catalog can be
//! swapped for any other source of type information.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::resolve::{normalize, ContainerError};

/// Opaque handle to a constructed service instance.
///
/// Instances are shared-ownership values. A shared service hands out clones
/// of the same handle; a transient service hands out a fresh one per
/// resolution.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// A value handed to a constructor for one of its parameters.
#[derive(Clone)]
pub enum Argument {
    /// No value is injected; the parameter falls back to its absent state.
    Absent,
    /// An injected value: a declared default or a resolved dependency.
    Value(Instance),
}

/// Ordered constructor arguments, consumed front to back.
///
/// The container supplies exactly one argument per declared parameter, in
/// declaration order.
pub struct Arguments {
    inner: std::vec::IntoIter<Argument>,
}

impl Arguments {
    pub fn new(args: Vec<Argument>) -> Self {
        Self {
            inner: args.into_iter(),
        }
    }

    /// Take the next argument as a required value of type `T`.
    ///
    /// `param` only serves diagnostics on mismatch.
    pub fn take<T: Any + Send + Sync>(&mut self, param: &str) -> Result<Arc<T>, ContainerError> {
        match self.inner.next() {
            Some(Argument::Value(value)) => value
                .downcast::<T>()
                .map_err(|_| ContainerError::TypeMismatch(param.to_string())),
            _ => Err(ContainerError::TypeMismatch(param.to_string())),
        }
    }

    /// Take the next argument, mapping an injected absence to `None`.
    pub fn take_optional<T: Any + Send + Sync>(
        &mut self,
        param: &str,
    ) -> Result<Option<Arc<T>>, ContainerError> {
        match self.inner.next() {
            Some(Argument::Value(value)) => value
                .downcast::<T>()
                .map(Some)
                .map_err(|_| ContainerError::TypeMismatch(param.to_string())),
            Some(Argument::Absent) | None => Ok(None),
        }
    }
}

/// Declares one constructor parameter: its name, declared type, nullability
/// and default value.
#[derive(Clone)]
pub struct ParamSpec {
    name: String,
    type_name: Option<String>,
    nullable: bool,
    default: Option<Instance>,
}

impl ParamSpec {
    /// A parameter whose declared type is a constructible service type.
    pub fn class(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: Some(type_name.into()),
            nullable: false,
            default: None,
        }
    }

    /// A parameter of a builtin/scalar type, with no service type to resolve.
    pub fn builtin(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: None,
            nullable: false,
            default: None,
        }
    }

    /// Mark the parameter as accepting an absent value.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Attach a declared default value.
    ///
    /// The same handle is injected on every construction that uses it.
    pub fn with_default<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.default = Some(Arc::new(value));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn default(&self) -> Option<&Instance> {
        self.default.as_ref()
    }
}

/// Access to constructor metadata and instantiation for named types.
///
/// This is the capability the resolution engine consumes. The stock
/// implementation is [TypeCatalog]; code generation or any other schema
/// source can stand in for it.
pub trait Reflect: Send + Sync {
    /// Constructor parameters of `type_name` in declaration order, or `None`
    /// if no such type is known.
    fn parameters_of(&self, type_name: &str) -> Option<Vec<ParamSpec>>;

    /// Build an instance of `type_name` from arguments matching the declared
    /// parameter order.
    fn instantiate(&self, type_name: &str, args: Vec<Argument>)
        -> Result<Instance, ContainerError>;
}

/// Implemented by types the container can build from resolved arguments.
pub trait Construct: Any + Send + Sync + Sized {
    /// Constructor parameter declarations, in order. Defaults to none.
    fn parameters() -> Vec<ParamSpec> {
        Vec::new()
    }

    /// Build an instance from arguments matching [parameters](Construct::parameters).
    fn construct(args: Arguments) -> Result<Self, ContainerError>;
}

/// Implement [Construct] for dependency-free types via their [Default] impl.
#[macro_export]
macro_rules! construct_default {
    ($($ty:ty),+ $(,)?) => {
        $(
        impl $crate::Construct for $ty {
            fn construct(_args: $crate::Arguments) -> Result<Self, $crate::ContainerError> {
                Ok(<$ty as Default>::default())
            }
        }
        )+
    };
}

type BuildFn = Box<dyn Fn(Vec<Argument>) -> Result<Instance, ContainerError> + Send + Sync>;

struct TypeEntry {
    params: Vec<ParamSpec>,
    build: BuildFn,
}

/// Registration-time schema catalog, the stock [Reflect] implementation.
///
/// The catalog answers "which types exist and how are they built", the
/// equivalent of a language runtime's class table. Re-declaring a name
/// replaces the previous schema.
#[derive(Default)]
pub struct TypeCatalog {
    types: HashMap<String, TypeEntry>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `T` constructible under `name`.
    pub fn declare<T: Construct>(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        let name = normalize(&name).to_string();
        debug!(type_name = %name, "declared constructible type");
        self.types.insert(
            name,
            TypeEntry {
                params: T::parameters(),
                build: Box::new(|args| -> Result<Instance, ContainerError> {
                    let built = T::construct(Arguments::new(args))?;
                    Ok(Arc::new(built) as Instance)
                }),
            },
        );
        self
    }
}

impl Reflect for TypeCatalog {
    fn parameters_of(&self, type_name: &str) -> Option<Vec<ParamSpec>> {
        self.types
            .get(normalize(type_name))
            .map(|entry| entry.params.clone())
    }

    fn instantiate(
        &self,
        type_name: &str,
        args: Vec<Argument>,
    ) -> Result<Instance, ContainerError> {
        let entry = self
            .types
            .get(normalize(type_name))
            .ok_or_else(|| ContainerError::NotFound(type_name.to_string()))?;
        (entry.build)(args)
    }
}
