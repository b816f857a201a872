use super::*;
use crate::bindings::BindingMap;
use crate::types::{ClassId, TypeDescriptor, TypeVarId};

#[test]
fn basic_enter_leave() {
    let mut guard = RecursionGuard::new(10, 100);
    assert_eq!(guard.enter(1u32), RecursionResult::Entered);
    assert_eq!(guard.depth, 1);
    assert!(guard.visiting.contains(&1));

    guard.leave(1);
    assert_eq!(guard.depth, 0);
    assert!(guard.visiting.is_empty());
}

#[test]
fn cycle_detected_on_same_key() {
    let mut guard = RecursionGuard::new(10, 100);
    assert_eq!(guard.enter(7u64), RecursionResult::Entered);
    assert_eq!(guard.enter(7u64), RecursionResult::Cycle);

    // Cycle does not increment depth
    assert_eq!(guard.depth, 1);
    assert_eq!(guard.iterations, 2);

    guard.leave(7);
}

#[test]
fn depth_exceeded() {
    let mut guard = RecursionGuard::new(2, 100);
    assert!(guard.enter(1u32).is_entered());
    assert!(guard.enter(2u32).is_entered());
    assert_eq!(guard.enter(3u32), RecursionResult::DepthExceeded);

    guard.leave(2);
    assert!(guard.enter(3u32).is_entered());
    guard.leave(3);
    guard.leave(1);
}

#[test]
fn iteration_exceeded() {
    let mut guard = RecursionGuard::new(10, 3);
    for key in 0u32..3 {
        assert!(guard.enter(key).is_entered());
        guard.leave(key);
    }
    assert_eq!(guard.enter(99u32), RecursionResult::IterationExceeded);
    assert_eq!(guard.enter(100u32), RecursionResult::IterationExceeded);
}

#[test]
fn descriptor_keys_differ_by_bindings() {
    let class = ClassId(40);
    let var = TypeVarId(3);
    let descriptor = TypeDescriptor::parametrized(class, [TypeDescriptor::Variable(var)]);
    let outer = BindingMap::new().with(var, TypeDescriptor::class(ClassId(41)));
    let inner = BindingMap::new().with(var, TypeDescriptor::class(ClassId(42)));

    let mut guard = RecursionGuard::with_profile(RecursionProfile::SupertypeWalk);
    assert!(guard.enter((descriptor.clone(), outer.clone())).is_entered());
    assert!(guard.enter((descriptor.clone(), inner.clone())).is_entered());
    assert_eq!(guard.enter((descriptor.clone(), outer.clone())), RecursionResult::Cycle);

    guard.leave((descriptor.clone(), inner));
    guard.leave((descriptor, outer));
    assert_eq!(guard.depth, 0);
}

#[test]
fn all_profiles_have_valid_limits() {
    let profiles = [
        RecursionProfile::BindingChain,
        RecursionProfile::RawTypeResolution,
        RecursionProfile::SupertypeWalk,
        RecursionProfile::PropertyPath,
    ];
    for profile in profiles {
        assert!(profile.max_depth() > 0, "{profile:?} has zero max_depth");
        assert!(
            profile.max_iterations() >= profile.max_depth(),
            "{profile:?} has max_iterations < max_depth"
        );

        let guard = RecursionGuard::<u32>::with_profile(profile);
        assert_eq!(guard.max_depth, profile.max_depth());
        assert_eq!(guard.max_iterations, profile.max_iterations());
    }
}

#[test]
fn custom_profile_uses_given_limits() {
    let profile = RecursionProfile::Custom {
        max_depth: 3,
        max_iterations: 9,
    };
    assert_eq!(profile.max_depth(), 3);
    assert_eq!(profile.max_iterations(), 9);
}
