//! Front-end name resolution as seen by lock analysis

use pretty_assertions::assert_eq;
use rlockcheck::features::lock_analysis::domain::AccessPath;
use rlockcheck::features::syntax::{
    Binding, CallExpr, Expr, FuncDecl, Inspector, SymbolKind, TypeOracle, VarScope,
};
use rlockcheck::{GoFrontend, ParsedProgram};

fn parse(source: &str) -> ParsedProgram {
    let mut frontend = GoFrontend::new();
    frontend.add_source("pkg/lock.go", source);
    frontend.build().unwrap()
}

fn function<'p>(parsed: &'p ParsedProgram, name: &str) -> &'p FuncDecl {
    parsed
        .program
        .functions()
        .find(|f| f.name.name == name)
        .unwrap_or_else(|| panic!("no function {name}"))
}

fn calls<'p>(parsed: &'p ParsedProgram, name: &str) -> Vec<&'p CallExpr> {
    let inspector = Inspector::new(&parsed.program);
    let body = function(parsed, name).body.as_ref().expect("function body");
    inspector.calls_in(body)
}

fn callee_path(parsed: &ParsedProgram, call: &CallExpr) -> Option<AccessPath> {
    AccessPath::build(&call.fun, &parsed.types)
}

#[test]
fn test_promoted_method_of_embedded_lock() {
    let parsed = parse(
        r#"package pkg

import "sync"

type Guarded struct {
	*sync.RWMutex
	n int
}

func (g *Guarded) Read() int {
	g.RLock()
	defer g.RUnlock()
	return g.n
}
"#,
    );
    let calls = calls(&parsed, "Read");
    assert_eq!(calls.len(), 2);

    let path = callee_path(&parsed, calls[0]).expect("g.RLock resolves");
    assert_eq!(path.describe(), "g.RLock");
    let method = parsed.types.symbol(path.last().symbol).unwrap();
    let SymbolKind::Method { receiver } = &method.kind else {
        panic!("RLock should be a concrete method, got {:?}", method.kind);
    };
    assert_eq!(parsed.types.type_string(receiver), "*sync.RWMutex");
    assert_eq!(parsed.types.package_name(method.package), "sync");
}

#[test]
fn test_method_sets_keep_same_names_apart() {
    let parsed = parse(
        r#"package pkg

type A struct{}

func (a *A) Size() int { return 1 }

type B struct{}

func (b B) Size() int { return 2 }

func Both(a *A, b B) int {
	return a.Size() + b.Size()
}
"#,
    );
    let calls = calls(&parsed, "Both");
    assert_eq!(calls.len(), 2);
    let a = callee_path(&parsed, calls[0]).unwrap();
    let b = callee_path(&parsed, calls[1]).unwrap();
    assert_ne!(a.last().symbol, b.last().symbol);

    let receiver_of = |path: &AccessPath| match &parsed.types.symbol(path.last().symbol).unwrap().kind {
        SymbolKind::Method { receiver } => parsed.types.type_string(receiver.deref()),
        other => panic!("expected method, got {other:?}"),
    };
    assert_eq!(receiver_of(&a), "pkg.A");
    assert_eq!(receiver_of(&b), "pkg.B");
}

#[test]
fn test_shadowed_variable_is_a_different_root() {
    let parsed = parse(
        r#"package pkg

import "sync"

type Store struct {
	mu sync.RWMutex
}

func Shadow(s *Store, fresh bool) {
	s.mu.RLock()
	if fresh {
		s := &Store{}
		s.mu.RLock()
	}
}
"#,
    );
    let calls = calls(&parsed, "Shadow");
    assert_eq!(calls.len(), 2);
    let outer = callee_path(&parsed, calls[0]).unwrap();
    let inner = callee_path(&parsed, calls[1]).unwrap();

    assert_eq!(outer.describe(), inner.describe());
    assert!(!outer.equal(&inner, 1));
    assert_ne!(outer.root().symbol, inner.root().symbol);
    assert_eq!(outer.nodes()[1].symbol, inner.nodes()[1].symbol);

    let outer_root = parsed.types.symbol(outer.root().symbol).unwrap();
    let inner_root = parsed.types.symbol(inner.root().symbol).unwrap();
    assert_eq!(outer_root.kind, SymbolKind::Var(VarScope::Param));
    assert_eq!(inner_root.kind, SymbolKind::Var(VarScope::Local));
}

#[test]
fn test_package_variable_root() {
    let parsed = parse(
        r#"package pkg

import "sync"

var registry sync.RWMutex

func Lookup() {
	registry.RLock()
	registry.RUnlock()
}
"#,
    );
    let calls = calls(&parsed, "Lookup");
    let path = callee_path(&parsed, calls[0]).unwrap();
    assert_eq!(path.len(), 2);
    let root = parsed.types.symbol(path.root().symbol).unwrap();
    assert!(root.is_package_var());
    assert!(!root.is_exported());
}

#[test]
fn test_closure_variable_points_at_its_binding() {
    let parsed = parse(
        r#"package pkg

func Outer() int {
	read := func() int {
		helper()
		return 1
	}
	alias := read
	return alias()
}

func helper() {}
"#,
    );
    let inspector = Inspector::new(&parsed.program);
    let body = function(&parsed, "Outer").body.as_ref().unwrap();

    // helper() lives inside the literal and is not a call of Outer's body
    let calls = inspector.calls_in(body);
    assert_eq!(calls.len(), 1);

    let Expr::Ident(alias) = &calls[0].fun else {
        panic!("expected identifier callee");
    };
    let symbol = parsed.types.object_of(alias).unwrap();
    let decl = parsed.types.symbol(symbol).unwrap().decl.expect("declaring statement");
    let binding = inspector.binding(decl).expect("binding indexed");
    assert!(matches!(binding, Binding::Assign(_)));
    let Expr::Ident(read) = &binding.rhs()[0] else {
        panic!("alias is bound to read");
    };

    let read_decl = parsed
        .types
        .symbol(parsed.types.object_of(read).unwrap())
        .unwrap()
        .decl
        .unwrap();
    let read_binding = inspector.binding(read_decl).unwrap();
    assert!(matches!(read_binding.rhs()[0], Expr::FuncLit(_)));
    assert_eq!(read_binding.names()[0].map(|i| i.name.as_str()), Some("read"));
}

#[test]
fn test_members_of_external_packages_stay_unresolved() {
    let parsed = parse(
        r#"package pkg

import ext "example.com/ext"

func Use(t ext.Thing) {
	t.Do()
}
"#,
    );
    let calls = calls(&parsed, "Use");
    assert_eq!(calls.len(), 1);
    assert!(callee_path(&parsed, calls[0]).is_none());
}
