use super::*;
use crate::types::ClassId;

fn var(id: u32) -> TypeVarId {
    TypeVarId(id)
}

fn class(id: u32) -> TypeDescriptor {
    TypeDescriptor::class(ClassId(id))
}

#[test]
fn empty_map() {
    let map = BindingMap::new();
    assert!(map.is_empty());
    assert_eq!(map.len(), 0);
    assert_eq!(map.lookup(var(1)), None);
}

#[test]
fn with_does_not_mutate_original() {
    let base = BindingMap::new().with(var(1), class(10));
    let extended = base.with(var(2), class(20));

    assert_eq!(base.len(), 1);
    assert!(!base.contains(var(2)));
    assert_eq!(extended.len(), 2);
    assert_eq!(extended.get(var(1)), Some(&class(10)));
    assert_eq!(extended.get(var(2)), Some(&class(20)));
}

#[test]
fn later_bindings_win() {
    let map = BindingMap::new().with(var(1), class(10)).with(var(1), class(11));
    assert_eq!(map.get(var(1)), Some(&class(11)));
}

#[test]
fn flatten_follows_variable_chain() {
    // C -> B -> A -> String
    let map: BindingMap = [
        (var(3), TypeDescriptor::variable(var(2))),
        (var(2), TypeDescriptor::variable(var(1))),
        (var(1), class(10)),
    ]
    .into_iter()
    .collect();

    assert_eq!(map.flatten(&TypeDescriptor::variable(var(3))), class(10));
    assert_eq!(map.lookup(var(3)), Some(class(10)));
}

#[test]
fn flatten_stops_at_unbound_variable() {
    let map = BindingMap::new().with(var(2), TypeDescriptor::variable(var(1)));
    assert_eq!(
        map.flatten(&TypeDescriptor::variable(var(2))),
        TypeDescriptor::variable(var(1))
    );
}

#[test]
fn flatten_leaves_non_variables_alone() {
    let map = BindingMap::new().with(var(1), class(10));
    let list_of_t = TypeDescriptor::parametrized(ClassId(4), [TypeDescriptor::variable(var(1))]);
    assert_eq!(map.flatten(&list_of_t), list_of_t);
}

#[test]
fn flatten_terminates_on_cycle() {
    let map: BindingMap = [
        (var(1), TypeDescriptor::variable(var(2))),
        (var(2), TypeDescriptor::variable(var(1))),
    ]
    .into_iter()
    .collect();

    let flattened = map.flatten(&TypeDescriptor::variable(var(1)));
    assert!(flattened.is_variable());
}

#[test]
fn self_binding_terminates() {
    let map = BindingMap::new().with(var(1), TypeDescriptor::variable(var(1)));
    assert_eq!(map.lookup(var(1)), Some(TypeDescriptor::variable(var(1))));
}

#[test]
fn equal_maps_hash_equal() {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let a = BindingMap::new().with(var(1), class(10)).with(var(2), class(20));
    let b = BindingMap::new().with(var(2), class(20)).with(var(1), class(10));
    assert_eq!(a, b);

    let hash = |map: &BindingMap| {
        let mut hasher = DefaultHasher::new();
        map.hash(&mut hasher);
        hasher.finish()
    };
    assert_eq!(hash(&a), hash(&b));
}
