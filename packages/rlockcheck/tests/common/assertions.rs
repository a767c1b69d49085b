//! Assertions over analysis results

use rlockcheck::config::AnalyzerConfig;
use rlockcheck::{check_sources, Violation, ViolationKind};

/// Check a single-file package named `lock.go`
pub fn check(source: &str) -> Vec<Violation> {
    check_with(source, &AnalyzerConfig::default())
}

pub fn check_with(source: &str, config: &AnalyzerConfig) -> Vec<Violation> {
    check_sources(&[("lock.go", source)], config).expect("fixture should parse")
}

/// Assert that no violation was reported
pub fn assert_clean(violations: &[Violation]) {
    assert!(
        violations.is_empty(),
        "Expected no violations, got: {:#?}",
        violations
    );
}

/// Assert exactly one violation and return it
pub fn assert_single(violations: &[Violation]) -> &Violation {
    assert_eq!(
        violations.len(),
        1,
        "Expected exactly one violation, got: {:#?}",
        violations
    );
    &violations[0]
}

/// Assert a nested violation whose call stack names exactly `callees`
pub fn assert_nested(violation: &Violation, callees: &[&str]) {
    assert_eq!(violation.kind, ViolationKind::Nested, "{:#?}", violation);
    assert_eq!(violation.callee_names(), callees, "{:#?}", violation);
}

/// 1-based line of the first line of `source` containing `needle`
pub fn line_of(source: &str, needle: &str) -> u32 {
    source
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i as u32 + 1)
        .unwrap_or_else(|| panic!("'{}' not found in fixture", needle))
}
