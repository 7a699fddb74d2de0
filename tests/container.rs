//! End-to-end scenarios exercised through the public API only.

use std::sync::Arc;

use ikebana::*;

#[derive(Default)]
struct FooService;
construct_default!(FooService);

struct BarService {
    pub foo: Arc<FooService>,
}

impl Construct for BarService {
    fn parameters() -> Vec<ParamSpec> {
        vec![ParamSpec::class("foo", "app::FooService")]
    }
    fn construct(mut args: Arguments) -> Result<Self, ContainerError> {
        Ok(Self { foo: args.take("foo")? })
    }
}

struct OptionalService {
    pub optional: Option<Arc<FooService>>,
}

impl Construct for OptionalService {
    fn parameters() -> Vec<ParamSpec> {
        vec![ParamSpec::class("optional", "app::FooService").nullable()]
    }
    fn construct(mut args: Arguments) -> Result<Self, ContainerError> {
        Ok(Self {
            optional: args.take_optional("optional")?,
        })
    }
}

struct DefaultService {
    pub default_param: Arc<String>,
}

impl Construct for DefaultService {
    fn parameters() -> Vec<ParamSpec> {
        vec![ParamSpec::builtin("default_param").with_default(String::from("default"))]
    }
    fn construct(mut args: Arguments) -> Result<Self, ContainerError> {
        Ok(Self {
            default_param: args.take("default_param")?,
        })
    }
}

struct CircularDependenciesService;

impl Construct for CircularDependenciesService {
    fn parameters() -> Vec<ParamSpec> {
        vec![ParamSpec::class("inner", "app::CircularDependenciesService")]
    }
    fn construct(_args: Arguments) -> Result<Self, ContainerError> {
        Ok(Self)
    }
}

fn catalog() -> Arc<TypeCatalog> {
    let mut catalog = TypeCatalog::new();
    catalog
        .declare::<FooService>("app::FooService")
        .declare::<BarService>("app::BarService")
        .declare::<OptionalService>("app::OptionalService")
        .declare::<DefaultService>("app::DefaultService")
        .declare::<CircularDependenciesService>("app::CircularDependenciesService");
    Arc::new(catalog)
}

fn container_with(config: ContainerConfig) -> Arc<Container> {
    Container::new(config, catalog())
}

fn container() -> Arc<Container> {
    container_with(ContainerConfig::default())
}

#[test]
fn resolves_simple_service() -> Result<(), ContainerError> {
    let container = container();
    container.set_service_config(ServiceConfig::new("app::FooService")?)?;

    let _foo: Arc<FooService> = container.get_as("app::FooService")?;
    Ok(())
}

#[test]
fn resolves_service_with_dependencies() -> Result<(), ContainerError> {
    let container = container();
    container.set_services_config([
        ServiceConfig::new("app::FooService")?,
        ServiceConfig::new("app::BarService")?,
    ])?;

    let bar: Arc<BarService> = container.get_as("app::BarService")?;
    let _foo: &FooService = &bar.foo;
    Ok(())
}

#[test]
fn handles_optional_dependency_with_absence() -> Result<(), ContainerError> {
    let container = container_with(ContainerConfig {
        inject_none_for_optional: true,
        ..Default::default()
    });
    container.set_service_config(ServiceConfig::new("app::OptionalService")?)?;

    let service: Arc<OptionalService> = container.get_as("app::OptionalService")?;
    assert!(service.optional.is_none());
    Ok(())
}

#[test]
fn handles_default_parameter() -> Result<(), ContainerError> {
    let container = container();
    container.set_service_config(ServiceConfig::new("app::DefaultService")?)?;

    let service: Arc<DefaultService> = container.get_as("app::DefaultService")?;
    assert_eq!(service.default_param.as_str(), "default");
    Ok(())
}

#[test]
fn fails_for_unresolvable_service() {
    let container = container();
    let result = container.get("app::NonExistentService");
    assert!(matches!(result, Err(ContainerError::NotFound(_))));
}

#[test]
fn fails_for_circular_dependency() -> Result<(), ContainerError> {
    let container = container();
    container.set_service_config(ServiceConfig::new("app::CircularDependenciesService")?)?;

    let result = container.get("app::CircularDependenciesService");
    assert!(matches!(result, Err(ContainerError::CircularDependency(_))));
    Ok(())
}

#[test]
fn shared_instances_return_same_object() -> Result<(), ContainerError> {
    let container = container_with(ContainerConfig {
        all_shared_by_default: true,
        ..Default::default()
    });
    container.set_service_config(ServiceConfig::new("app::FooService")?)?;

    let first: Arc<FooService> = container.get_as("app::FooService")?;
    let second: Arc<FooService> = container.get_as("app::FooService")?;
    assert!(Arc::ptr_eq(&first, &second));
    Ok(())
}

#[test]
fn non_shared_instances_return_different_objects() -> Result<(), ContainerError> {
    let container = container_with(ContainerConfig {
        all_shared_by_default: false,
        ..Default::default()
    });
    container.set_service_config(ServiceConfig::new("app::FooService")?)?;

    let first: Arc<FooService> = container.get_as("app::FooService")?;
    let second: Arc<FooService> = container.get_as("app::FooService")?;
    assert!(!Arc::ptr_eq(&first, &second));
    Ok(())
}

#[test]
fn resolves_alias() -> Result<(), ContainerError> {
    let container = container();
    container
        .set_service_config(ServiceConfig::new("app::FooService")?.with_alias("foo_alias")?)?;

    let by_alias: Arc<FooService> = container.get_as("foo_alias")?;
    let _ = by_alias;
    Ok(())
}

#[test]
fn resolves_type_known_to_catalog_but_never_registered() -> Result<(), ContainerError> {
    let container = container();

    let _foo: Arc<FooService> = container.get_as("app::FooService")?;
    assert!(!container.has("app::FooService"));
    Ok(())
}

#[test]
fn resolves_itself_under_reserved_identifiers() -> Result<(), ContainerError> {
    let container = container();

    let by_alias: Arc<Container> = container.get_as(Container::SERVICE_ALIAS)?;
    assert!(Arc::ptr_eq(&container, &by_alias));
    Ok(())
}
