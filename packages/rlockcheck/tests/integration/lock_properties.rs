//! Behavioral properties of the lock tracker and nested-lock search

#[path = "../common/mod.rs"]
mod common;

use common::*;
use pretty_assertions::assert_eq;
use rlockcheck::config::{AnalyzerConfig, LockConfig, Preset};
use rlockcheck::ViolationKind;

#[test]
fn test_helper_reacquiring_is_reported_once() {
    let violations = check(HELPER_REACQUIRES);
    let v = assert_single(&violations);
    assert_nested(v, &["Store.Get", "RWMutex.RLock"]);
    assert_eq!(v.function, "Store.Sum");
    assert_eq!(v.lock_description, "s.mu");
    assert_eq!(v.location.line, line_of(HELPER_REACQUIRES, "total += s.Get(k)"));
    assert_eq!(v.call_stack[0].location.line, v.location.line);
    assert_eq!(
        v.call_stack[1].location.line,
        line_of(HELPER_REACQUIRES, "s.mu.RLock()")
    );
}

#[test]
fn test_sequential_acquisition_is_clean() {
    assert_clean(&check(SEQUENTIAL));
}

#[test]
fn test_deferred_release_then_return_is_clean() {
    assert_clean(&check(DEFER_THEN_RETURN));
}

#[test]
fn test_acquisition_before_deferred_release_fires() {
    let violations = check(DEFER_THEN_CALL);
    let v = assert_single(&violations);
    assert_nested(v, &["Store.Get", "RWMutex.RLock"]);
    assert_eq!(v.function, "Store.Doubled");
    assert_eq!(v.location.line, line_of(DEFER_THEN_CALL, "v := s.Get()"));
}

#[test]
fn test_count_restored_after_early_return() {
    let violations = check(EARLY_RETURN);
    let v = assert_single(&violations);
    assert_eq!(v.function, "Store.Maybe");
    assert_eq!(v.location.line, line_of(EARLY_RETURN, "v := s.Get()"));
}

#[test]
fn test_receiver_type_disambiguates_methods() {
    let violations = check(SAME_METHOD_NAME);
    let v = assert_single(&violations);
    assert_nested(v, &["Cache.Size", "RWMutex.RLock"]);
    assert_eq!(v.location.line, line_of(SAME_METHOD_NAME, "total += c.Size()"));
}

#[test]
fn test_independent_instances_do_not_mix() {
    let violations = check(TWO_INSTANCES);
    let v = assert_single(&violations);
    assert_eq!(v.function, "Compare");
    assert_eq!(v.lock_description, "b.mu");
    assert_eq!(v.location.line, line_of(TWO_INSTANCES, "z := b.Get()"));
}

#[test]
fn test_mutual_recursion_terminates_clean() {
    assert_clean(&check(MUTUAL_RECURSION));
}

#[test]
fn test_direct_reacquisition_in_one_body() {
    let violations = check(DIRECT_TWICE);
    let v = assert_single(&violations);
    assert_eq!(v.kind, ViolationKind::Direct);
    assert!(v.call_stack.is_empty());
    assert_eq!(v.lock_description, "s.mu");
    assert_eq!(v.location.line, line_of(DIRECT_TWICE, "s.mu.RLock()") + 1);
}

#[test]
fn test_closure_reached_through_bindings() {
    let violations = check(CLOSURE_CALL);
    let v = assert_single(&violations);
    assert_nested(v, &["alias", "RWMutex.RLock"]);
    assert_eq!(v.function, "Store.Each");
    assert_eq!(v.location.line, line_of(CLOSURE_CALL, "v := alias()"));
}

#[test]
fn test_reassigned_closure_variable_is_not_followed() {
    assert_clean(&check(REASSIGNED_CLOSURE));
}

#[test]
fn test_closure_from_multi_value_call_is_not_followed() {
    assert_clean(&check(MISMATCHED_BINDING));
}

#[test]
fn test_deferred_closure_counts_as_release() {
    assert_clean(&check(DEFERRED_CLOSURE_RELEASE));
}

#[test]
fn test_interface_calls_are_not_followed() {
    assert_clean(&check(INTERFACE_CALL));
}

#[test]
fn test_argument_carries_lock_into_function() {
    let violations = check(ARGUMENT_CARRY);
    let v = assert_single(&violations);
    assert_nested(v, &["read", "RWMutex.RLock"]);
    assert_eq!(v.function, "Outer");
}

#[test]
fn test_conservative_preset_ignores_arguments() {
    let config = AnalyzerConfig::preset(Preset::Conservative);
    assert_clean(&check_with(ARGUMENT_CARRY, &config));
}

#[test]
fn test_conservative_preset_still_follows_receivers() {
    let config = AnalyzerConfig::preset(Preset::Conservative);
    let violations = check_with(HELPER_REACQUIRES, &config);
    assert_nested(assert_single(&violations), &["Store.Get", "RWMutex.RLock"]);
}

#[test]
fn test_lock_operation_names_are_configurable() {
    assert_clean(&check(EXCLUSIVE_TWICE));

    let mut config = AnalyzerConfig::default();
    config.lock = LockConfig {
        acquire: "Lock".to_string(),
        release: "Unlock".to_string(),
    };
    let violations = check_with(EXCLUSIVE_TWICE, &config);
    let v = assert_single(&violations);
    assert_eq!(v.kind, ViolationKind::Direct);
    assert_eq!(v.location.line, line_of(EXCLUSIVE_TWICE, "s.mu.Lock()") + 1);
}

#[test]
fn test_violations_are_sorted_by_location() {
    let source = format!(
        "{}\nfunc (s *Store) Again() int {{\n\ts.mu.RLock()\n\ts.mu.RLock()\n\ts.mu.RUnlock()\n\ts.mu.RUnlock()\n\treturn 0\n}}\n",
        DIRECT_TWICE
    );
    let violations = check(&source);
    assert_eq!(violations.len(), 2);
    assert!(violations[0].location.line < violations[1].location.line);
    assert_eq!(violations[1].function, "Store.Again");
}
