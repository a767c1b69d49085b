//! Whole-package scenarios: package-level locks, embedded locks, multi-file packages

#[path = "../common/mod.rs"]
mod common;

use common::*;
use pretty_assertions::assert_eq;
use rlockcheck::config::{AnalyzerConfig, Preset};
use rlockcheck::{check_sources, renderer_for, OutputFormat, ReportRenderer, TextRenderer};

#[test]
fn test_package_lock_followed_through_call_chain() {
    let violations = check(PACKAGE_LOCK_CHAIN);
    let v = assert_single(&violations);
    assert_nested(v, &["DoSomethingElse", "YetAnotherThing", "Mutex.RLock"]);
    assert_eq!(v.function, "DoSomething");
    assert_eq!(v.lock_description, "mutex");
    assert_eq!(
        v.call_stack[1].location.line,
        line_of(PACKAGE_LOCK_CHAIN, "\tYetAnotherThing()")
    );
}

#[test]
fn test_package_lock_carry_is_a_preset_choice() {
    let config = AnalyzerConfig::preset(Preset::Conservative);
    assert_clean(&check_with(PACKAGE_LOCK_CHAIN, &config));
}

#[test]
fn test_embedded_lock_and_same_named_method() {
    let violations = check(EMBEDDED_LOCK);
    let v = assert_single(&violations);
    assert_nested(v, &["ProtectResource.GetResource", "RWMutex.RLock"]);
    assert_eq!(v.function, "main");
    assert_eq!(v.lock_description, "resource");
    assert_eq!(
        v.location.line,
        line_of(EMBEDDED_LOCK, "_ = resource.GetResource()")
    );
}

#[test]
fn test_methods_split_across_files() {
    let types = r#"package store

import "sync"

type Store struct {
	mu sync.RWMutex
	n  int
}

func (s *Store) Get() int {
	s.mu.RLock()
	defer s.mu.RUnlock()
	return s.n
}
"#;
    let usage = r#"package store

func (s *Store) Twice() int {
	s.mu.RLock()
	a := s.Get()
	s.mu.RUnlock()
	return a * 2
}
"#;
    let violations = check_sources(
        &[("store/types.go", types), ("store/usage.go", usage)],
        &AnalyzerConfig::default(),
    )
    .unwrap();
    let v = assert_single(&violations);
    assert_eq!(v.location.file, "store/usage.go");
    assert_eq!(v.call_stack[1].location.file, "store/types.go");
}

#[test]
fn test_same_package_name_in_other_directory_is_separate() {
    let a = r#"package store

import "sync"

type Store struct {
	mu sync.RWMutex
}

func (s *Store) Get() int {
	return 1
}

func (s *Store) Use() int {
	s.mu.RLock()
	n := s.Get()
	s.mu.RUnlock()
	return n
}
"#;
    let b = r#"package store

import "sync"

type Store struct {
	mu sync.RWMutex
}

func (s *Store) Get() int {
	s.mu.RLock()
	defer s.mu.RUnlock()
	return 2
}
"#;
    let violations = check_sources(
        &[("one/store.go", a), ("two/store.go", b)],
        &AnalyzerConfig::default(),
    )
    .unwrap();
    assert_clean(&violations);
}

#[test]
fn test_text_report_shape() {
    let violations = check(PACKAGE_LOCK_CHAIN);
    let text = TextRenderer::new().render(&violations).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("lock.go:"));
    assert!(lines[0].ends_with("found recursive read lock call on mutex in DoSomething"));
    assert!(lines[1].starts_with("\t\"DoSomethingElse\" at lock.go:"));
    assert!(lines[3].starts_with("\t\"Mutex.RLock\" at lock.go:"));
}

#[test]
fn test_json_report_lists_frames() {
    let violations = check(EMBEDDED_LOCK);
    let json = renderer_for(OutputFormat::Json).render(&violations).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value[0]["kind"], "nested");
    assert_eq!(value[0]["call_stack"].as_array().map(|a| a.len()), Some(2));
    assert_eq!(value[0]["call_stack"][0]["callee_name"], "ProtectResource.GetResource");
}
