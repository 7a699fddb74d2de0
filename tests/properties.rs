//! Property-based tests over registration and resolution.

use std::sync::Arc;

use ikebana::*;
use proptest::prelude::*;

#[derive(Default)]
struct ProbeService;
construct_default!(ProbeService);

// Short lowercase identifiers; too short to ever collide with the reserved
// container alias, and free of namespace separators.
fn service_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,16}"
}

fn container_for(name: &str, config: ContainerConfig) -> Arc<Container> {
    let mut catalog = TypeCatalog::new();
    catalog.declare::<ProbeService>(name);
    Container::new(config, Arc::new(catalog))
}

proptest! {
    #[test]
    fn duplicate_registration_always_fails(name in service_name()) {
        let container = container_for(&name, ContainerConfig::default());
        container.set_service_config(ServiceConfig::new(&name).unwrap()).unwrap();

        let result = container.set_service_config(ServiceConfig::new(&name).unwrap());
        prop_assert!(matches!(result, Err(ContainerError::AlreadyDefined(_))));
        prop_assert!(container.has(&name));
    }

    #[test]
    fn shared_default_yields_identical_handles(name in service_name()) {
        let container = container_for(&name, ContainerConfig {
            all_shared_by_default: true,
            ..Default::default()
        });
        container.set_service_config(ServiceConfig::new(&name).unwrap()).unwrap();

        let first: Arc<ProbeService> = container.get_as(&name).unwrap();
        let second: Arc<ProbeService> = container.get_as(&name).unwrap();
        prop_assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn transient_default_yields_distinct_handles(name in service_name()) {
        let container = container_for(&name, ContainerConfig::default());
        container.set_service_config(ServiceConfig::new(&name).unwrap()).unwrap();

        let first: Arc<ProbeService> = container.get_as(&name).unwrap();
        let second: Arc<ProbeService> = container.get_as(&name).unwrap();
        prop_assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn alias_resolution_matches_canonical_resolution(name in service_name()) {
        let alias = format!("{name}_alias");
        let container = container_for(&name, ContainerConfig {
            all_shared_by_default: true,
            ..Default::default()
        });
        container.set_service_config(
            ServiceConfig::new(&name).unwrap().with_alias(&alias).unwrap(),
        ).unwrap();

        let canonical: Arc<ProbeService> = container.get_as(&name).unwrap();
        let aliased: Arc<ProbeService> = container.get_as(&alias).unwrap();
        prop_assert!(Arc::ptr_eq(&canonical, &aliased));
    }

    #[test]
    fn unknown_identifiers_are_not_found(name in service_name()) {
        let container = Container::new(
            ContainerConfig::default(),
            Arc::new(TypeCatalog::new()),
        );
        let result = container.get(&name);
        prop_assert!(matches!(result, Err(ContainerError::NotFound(_))));
    }
}
