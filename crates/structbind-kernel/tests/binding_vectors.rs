//! Integration tests: resolve binding plans over the contract fixture catalog.
//!
//! tests/fixtures/contracts.json declares value types, view contracts and
//! delegate implementations. Each test resolves one (views, delegate) pair
//! through the store and checks the resulting plan or diagnostic.

use std::path::PathBuf;
use std::sync::Arc;
use structbind_kernel::{
    BindingError, BindingsStore, ImplementationSite, MethodBinding, SchemaCatalog,
    StructBindings, TypeId, find_converging_types,
};

fn fixture_catalog() -> SchemaCatalog {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/contracts.json");
    SchemaCatalog::load(&path)
        .unwrap_or_else(|e| panic!("failed to load {}: {e}", path.display()))
}

fn ids(names: &[&str]) -> Vec<TypeId> {
    names.iter().map(|name| TypeId::from(*name)).collect()
}

fn bind(primary: &str, additional: &[&str], delegate: Option<&str>) -> Arc<StructBindings> {
    let store = BindingsStore::new(fixture_catalog());
    let delegate = delegate.map(TypeId::from);
    store
        .get_bindings(&TypeId::from(primary), &ids(additional), delegate.as_ref())
        .unwrap_or_else(|e| panic!("resolution should succeed: {e}: {}", e.cause()))
}

fn bind_err(primary: &str, additional: &[&str], delegate: Option<&str>) -> BindingError {
    let store = BindingsStore::new(fixture_catalog());
    let delegate = delegate.map(TypeId::from);
    match store.get_bindings(&TypeId::from(primary), &ids(additional), delegate.as_ref()) {
        Ok(bindings) => panic!("resolution should fail, got:\n{bindings}"),
        Err(err) => err.into_cause(),
    }
}

/// `Kind source -> implementor` lines, one per binding.
fn summary(bindings: &StructBindings) -> Vec<String> {
    bindings
        .method_bindings()
        .iter()
        .map(|binding| match binding {
            MethodBinding::ManagedProperty { source, property } => {
                format!("managed {source} -> {}", property.name)
            }
            MethodBinding::Direct {
                source,
                implementor,
            } => format!("direct {source} -> {implementor}"),
            MethodBinding::Delegate {
                source,
                implementor,
            } => format!("delegate {source} -> {implementor}"),
        })
        .collect()
}

#[test]
fn empty_type_resolves_to_empty_plan() {
    let bindings = bind("Empty", &[], None);
    let views: Vec<&TypeId> = bindings.declared_views().iter().map(|v| &v.id).collect();
    assert_eq!(views, vec![&TypeId::from("Empty")]);
    assert!(bindings.delegate().is_none());
    assert!(bindings.managed_properties().is_empty());
    assert!(bindings.method_bindings().is_empty());
}

#[test]
fn abstract_accessors_become_a_managed_property() {
    let bindings = bind("ManagedZ", &[], None);

    let property = bindings.managed_property("z").expect("property z");
    assert_eq!(property.property_type, TypeId::from("int"));
    assert_eq!(property.getters.len(), 1);
    assert_eq!(property.setters.len(), 1);
    assert_eq!(bindings.managed_properties().len(), 1);

    assert_eq!(
        summary(&bindings),
        vec!["managed ManagedZ.getZ() -> z", "managed ManagedZ.setZ(int) -> z"]
    );
    for binding in bindings.method_bindings() {
        assert!(binding.implementor().is_none());
        assert!(property.backs(binding.source()));
        assert_eq!(binding.property(), Some(property));
    }
}

#[test]
fn boolean_is_getter_pairs_with_setter() {
    let bindings = bind("Toggle", &[], None);
    let property = bindings.managed_property("enabled").expect("property enabled");
    assert_eq!(property.property_type, TypeId::from("boolean"));
    assert_eq!(bindings.method_bindings().len(), 2);
}

#[test]
fn managed_properties_keep_first_encountered_order() {
    let bindings = bind("Labelled", &["ManagedZ"], None);
    let names: Vec<&str> = bindings
        .managed_properties()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(names, vec!["label", "z"]);
}

#[test]
fn implemented_accessors_bind_directly() {
    let bindings = bind("ImplementedZ", &[], None);
    assert!(bindings.managed_properties().is_empty());
    assert_eq!(
        summary(&bindings),
        vec![
            "direct ImplementedZ.getZ() -> ImplementedZ.getZ()",
            "direct ImplementedZ.setZ(int) -> ImplementedZ.setZ(int)",
        ]
    );
    assert_eq!(
        bindings.method_bindings()[0].implementing_view(),
        Some(&TypeId::from("ImplementedZ"))
    );
}

#[test]
fn abstract_accessors_delegate_to_implementation() {
    let bindings = bind("ManagedZ", &[], Some("ImplementedZ"));
    assert!(bindings.managed_properties().is_empty());
    assert_eq!(
        bindings.delegate().map(|d| d.id.clone()),
        Some(TypeId::from("ImplementedZ"))
    );
    assert_eq!(
        summary(&bindings),
        vec![
            "delegate ManagedZ.getZ() -> ImplementedZ.getZ()",
            "delegate ManagedZ.setZ(int) -> ImplementedZ.setZ(int)",
        ]
    );
}

#[test]
fn delegate_only_methods_follow_view_methods() {
    let bindings = bind("ManagedZ", &[], Some("ExtendedZImpl"));
    assert_eq!(
        summary(&bindings),
        vec![
            "delegate ManagedZ.getZ() -> ImplementedZ.getZ()",
            "delegate ManagedZ.setZ(int) -> ImplementedZ.setZ(int)",
            "delegate ExtendedZImpl.describe() -> ExtendedZImpl.describe()",
        ]
    );
}

#[test]
fn view_and_delegate_implementing_the_same_method_conflict() {
    let err = bind_err("ImplementedZ", &[], Some("GetZImpl"));
    assert!(err.is_conflicting_implementation());
    insta::assert_snapshot!(
        err.to_string(),
        @"method getZ() is implemented by both view ImplementedZ.getZ() and delegate GetZImpl.getZ()"
    );
}

#[test]
fn unrelated_views_implementing_the_same_method_conflict() {
    let err = bind_err("LeftDescribed", &["RightDescribed"], None);
    insta::assert_snapshot!(
        err.to_string(),
        @"method describe() is implemented by both view LeftDescribed.describe() and view RightDescribed.describe()"
    );
    match err {
        BindingError::ConflictingImplementation { first, second, .. } => {
            assert_eq!(first.method().declaring_type, TypeId::from("LeftDescribed"));
            assert_eq!(second.method().declaring_type, TypeId::from("RightDescribed"));
        }
        other => panic!("expected conflicting implementation, got {other}"),
    }
}

#[test]
fn delegate_inheriting_unrelated_implementations_conflicts() {
    let err = bind_err("Describable", &[], Some("BothDescribed"));
    insta::assert_snapshot!(
        err.to_string(),
        @"method describe() is implemented by both delegate LeftDescribed.describe() and delegate RightDescribed.describe()"
    );
    match err {
        BindingError::ConflictingImplementation { first, second, .. } => {
            assert!(matches!(first, ImplementationSite::Delegate(_)));
            assert!(matches!(second, ImplementationSite::Delegate(_)));
        }
        other => panic!("expected conflicting implementation, got {other}"),
    }
}

#[test]
fn abstract_delegate_only_methods_are_not_bound() {
    let bindings = bind("ManagedZ", &[], Some("RunnableZImpl"));
    assert_eq!(
        summary(&bindings),
        vec![
            "delegate ManagedZ.getZ() -> ImplementedZ.getZ()",
            "delegate ManagedZ.setZ(int) -> ImplementedZ.setZ(int)",
        ]
    );
    assert!(
        bindings
            .method_bindings()
            .iter()
            .all(|binding| binding.source().name != "run")
    );
}

#[test]
fn split_accessors_between_view_and_delegate_are_rejected() {
    let err = bind_err("GetterImplementedZ", &[], Some("SetZImpl"));
    assert!(err.is_conflicting_implementation());
    match err {
        BindingError::DualImplementation {
            property,
            view,
            delegate,
        } => {
            assert_eq!(property, "z");
            assert_eq!(view.to_string(), "GetterImplementedZ.getZ()");
            assert_eq!(delegate.to_string(), "SetZImpl.setZ(int)");
        }
        other => panic!("expected dual implementation, got {other}"),
    }
}

#[test]
fn setter_on_view_with_getter_on_delegate_is_rejected() {
    let err = bind_err("SetterImplementedZ", &[], Some("GetZImpl"));
    assert!(err.is_conflicting_implementation());
    insta::assert_snapshot!(
        err.to_string(),
        @"property 'z' is implemented partly by view SetterImplementedZ.setZ(int) and partly by delegate GetZImpl.getZ()"
    );
    assert!(matches!(err, BindingError::DualImplementation { .. }));
}

#[test]
fn setter_without_getter_is_incomplete() {
    let err = bind_err("SetterOnly", &[], None);
    assert!(matches!(
        &err,
        BindingError::IncompleteProperty { property, .. } if property == "z"
    ));
    insta::assert_snapshot!(
        err.to_string(),
        @"property 'z' is not valid: it must both have an abstract getter as well as a setter (found SetterOnly.setZ(int))"
    );
}

#[test]
fn abstract_half_next_to_implemented_half_is_incomplete() {
    let err = bind_err("GetterImplementedZ", &[], None);
    match err {
        BindingError::IncompleteProperty { property, declared } => {
            assert_eq!(property, "z");
            assert_eq!(declared.len(), 1);
            assert_eq!(declared[0].to_string(), "GetterImplementedZ.setZ(int)");
        }
        other => panic!("expected incomplete property, got {other}"),
    }
}

#[test]
fn mismatched_accessor_types_are_inconsistent() {
    let err = bind_err("MismatchedZ", &[], None);
    insta::assert_snapshot!(
        err.to_string(),
        @"property 'z' is not valid: it must have a consistent type, but it's defined as String, int"
    );
}

#[test]
fn inconsistent_types_are_listed_in_first_seen_order_across_views() {
    let err = bind_err("ManagedZ", &["MismatchedZ"], None);
    match err {
        BindingError::InconsistentPropertyType { property, types } => {
            assert_eq!(property, "z");
            assert_eq!(types, ids(&["int", "String"]));
        }
        other => panic!("expected inconsistent property type, got {other}"),
    }
}

#[test]
fn abstract_non_accessor_without_implementation_is_rejected() {
    let err = bind_err("Runnable", &[], None);
    assert!(matches!(err, BindingError::UnimplementedMethod(_)));
}

#[test]
fn covariant_overrides_delegate_to_the_narrowest_implementation() {
    let bindings = bind("HasNumberValue", &["HasIntegralValue"], Some("SmallValueImpl"));

    let pairs: Vec<(String, String, String)> = bindings
        .method_bindings()
        .iter()
        .map(|binding| match binding {
            MethodBinding::Delegate {
                source,
                implementor,
            } => (
                source.return_type.to_string(),
                implementor.return_type.to_string(),
                implementor.to_string(),
            ),
            other => panic!("expected delegate binding, got {other}"),
        })
        .collect();

    assert_eq!(
        pairs,
        vec![
            (
                "Number".to_string(),
                "SmallInt".to_string(),
                "SmallValueImpl.getValue()".to_string()
            ),
            (
                "Integral".to_string(),
                "SmallInt".to_string(),
                "SmallValueImpl.getValue()".to_string()
            ),
        ]
    );
    assert_eq!(
        bindings.declared_views().len(),
        2,
        "declared views keep the ancestor contract"
    );

    let views = bindings.view_set();
    assert_eq!(views.primary().id, TypeId::from("HasNumberValue"));
    let scanned: Vec<TypeId> = views
        .converged(&fixture_catalog())
        .iter()
        .map(|view| view.id.clone())
        .collect();
    assert_eq!(scanned, ids(&["HasIntegralValue"]));
}

#[test]
fn overriding_view_supplies_the_direct_implementation() {
    let bindings = bind("Describable", &["DescribedBase"], None);
    assert_eq!(
        summary(&bindings),
        vec!["direct Describable.describe() -> DescribedBase.describe()"]
    );
}

#[test]
fn converging_types_keep_unrelated_leaves_in_first_occurrence_order() {
    let catalog = fixture_catalog();
    assert_eq!(
        find_converging_types(&ids(&["Number", "Integral", "Decimal"]), &catalog),
        ids(&["Integral", "Decimal"])
    );
    assert_eq!(
        find_converging_types(&ids(&["Number"]), &catalog),
        ids(&["Number"])
    );
    assert_eq!(
        find_converging_types(&ids(&["Integral", "Number", "Decimal"]), &catalog),
        ids(&["Integral", "Decimal"])
    );
    assert_eq!(
        find_converging_types(&ids(&["SmallInt", "Number", "Integral"]), &catalog),
        ids(&["SmallInt"])
    );
}
