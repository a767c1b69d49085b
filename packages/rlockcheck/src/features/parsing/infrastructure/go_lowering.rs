//! Go syntax lowering
//!
//! Converts a tree-sitter-go concrete tree into the owned syntax tree of
//! `features::syntax`. Constructs the lock analysis has no interest in are
//! kept as `Compound`/`Other` nodes so their nested calls stay visible.

use tree_sitter::Node as TSNode;

use crate::features::syntax::domain::{
    AssignStmt, Block, CallExpr, CompositeLit, CompoundStmt, Decl, DeferStmt, Expr, FieldDecl,
    FileId, FuncDecl, FuncLit, GoStmt, Ident, ImportSpec, NodeId, OtherExpr, Param, ParenExpr,
    Receiver, ReturnStmt, SelectorExpr, SourceFile, Stmt, TypeExpr, TypeSpec, TypeSpecKind,
    UnaryExpr, ValueSpec,
};
use crate::shared::utils::tree_sitter::{
    extract_node_text, field_children, find_child_by_kind, has_child_kind, named_children,
    node_to_span, unquote,
};

/// Per-file lowering context
pub struct GoLowering<'s> {
    source: &'s str,
    file: FileId,
    next_local: u32,
}

impl<'s> GoLowering<'s> {
    pub fn new(source: &'s str, file: FileId) -> Self {
        Self {
            source,
            file,
            next_local: 0,
        }
    }

    fn next_id(&mut self) -> NodeId {
        let id = NodeId::new(self.file, self.next_local);
        self.next_local += 1;
        id
    }

    fn text(&self, node: &TSNode) -> &'s str {
        extract_node_text(node, self.source)
    }

    fn ident(&mut self, node: &TSNode) -> Ident {
        Ident {
            id: self.next_id(),
            name: self.text(node).to_string(),
            span: node_to_span(node),
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Top level
    // ═══════════════════════════════════════════════════════════════════

    pub fn lower_file(&mut self, root: &TSNode, path: &str, dir: &str) -> SourceFile {
        let mut package = String::new();
        let mut imports = Vec::new();
        let mut decls = Vec::new();

        for child in named_children(root) {
            match child.kind() {
                "package_clause" => {
                    if let Some(name) = find_child_by_kind(&child, "package_identifier") {
                        package = self.text(&name).to_string();
                    }
                }
                "import_declaration" => self.collect_imports(&child, &mut imports),
                "function_declaration" | "method_declaration" => {
                    decls.push(Decl::Func(self.lower_func(&child)));
                }
                "var_declaration" | "const_declaration" => {
                    for spec in self.lower_value_specs(&child) {
                        decls.push(Decl::Var(spec));
                    }
                }
                "type_declaration" => {
                    for spec in named_children(&child) {
                        if matches!(spec.kind(), "type_spec" | "type_alias") {
                            decls.push(Decl::Type(self.lower_type_spec(&spec)));
                        }
                    }
                }
                _ => {}
            }
        }

        SourceFile {
            id: self.file,
            path: path.to_string(),
            package,
            dir: dir.to_string(),
            imports,
            decls,
        }
    }

    fn collect_imports(&mut self, node: &TSNode, out: &mut Vec<ImportSpec>) {
        for child in named_children(node) {
            match child.kind() {
                "import_spec" => {
                    let Some(path) = child.child_by_field_name("path") else {
                        continue;
                    };
                    out.push(ImportSpec {
                        name: child
                            .child_by_field_name("name")
                            .map(|n| self.text(&n).to_string()),
                        path: unquote(self.text(&path)).to_string(),
                    });
                }
                "import_spec_list" => self.collect_imports(&child, out),
                _ => {}
            }
        }
    }

    fn lower_func(&mut self, node: &TSNode) -> FuncDecl {
        let id = self.next_id();
        let name = match node.child_by_field_name("name") {
            Some(n) => self.ident(&n),
            None => Ident {
                id: self.next_id(),
                name: String::new(),
                span: node_to_span(node),
            },
        };
        let receiver = node
            .child_by_field_name("receiver")
            .and_then(|list| self.lower_receiver(&list));
        let params = node
            .child_by_field_name("parameters")
            .map(|list| self.lower_params(&list))
            .unwrap_or_default();
        let result = node
            .child_by_field_name("result")
            .and_then(|r| self.lower_result(&r));
        let body = node
            .child_by_field_name("body")
            .map(|b| self.lower_block(&b));

        FuncDecl {
            id,
            name,
            receiver,
            params,
            result,
            body,
            span: node_to_span(node),
        }
    }

    fn lower_receiver(&mut self, list: &TSNode) -> Option<Receiver> {
        let decl = named_children(list)
            .into_iter()
            .find(|c| c.kind() == "parameter_declaration")?;
        let name = decl
            .child_by_field_name("name")
            .map(|n| self.ident(&n));
        let ty = decl
            .child_by_field_name("type")
            .map(|t| self.lower_type(&t))
            .unwrap_or(TypeExpr::Other);
        Some(Receiver { name, ty })
    }

    fn lower_params(&mut self, list: &TSNode) -> Vec<Param> {
        let mut params = Vec::new();
        for child in named_children(list) {
            let variadic = match child.kind() {
                "parameter_declaration" => false,
                "variadic_parameter_declaration" => true,
                _ => continue,
            };
            let names = field_children(&child, "name")
                .iter()
                .map(|n| self.ident(n))
                .collect();
            let ty = child
                .child_by_field_name("type")
                .map(|t| self.lower_type(&t))
                .unwrap_or(TypeExpr::Other);
            params.push(Param {
                names,
                ty,
                variadic,
            });
        }
        params
    }

    /// Single result type; multi-value results are not tracked
    fn lower_result(&mut self, node: &TSNode) -> Option<TypeExpr> {
        if node.kind() != "parameter_list" {
            return Some(self.lower_type(node));
        }
        let params = self.lower_params(node);
        match params.as_slice() {
            [single] if single.names.len() <= 1 => Some(single.ty.clone()),
            _ => None,
        }
    }

    fn lower_type(&mut self, node: &TSNode) -> TypeExpr {
        match node.kind() {
            "type_identifier" | "identifier" => TypeExpr::Name(self.text(node).to_string()),
            "qualified_type" => {
                let package = node
                    .child_by_field_name("package")
                    .map(|n| self.text(&n).to_string())
                    .unwrap_or_default();
                let name = node
                    .child_by_field_name("name")
                    .map(|n| self.text(&n).to_string())
                    .unwrap_or_default();
                TypeExpr::Qualified { package, name }
            }
            "pointer_type" => match named_children(node).first() {
                Some(inner) => TypeExpr::Pointer(Box::new(self.lower_type(inner))),
                None => TypeExpr::Other,
            },
            "function_type" => TypeExpr::Func {
                result: node
                    .child_by_field_name("result")
                    .and_then(|r| self.lower_result(&r))
                    .map(Box::new),
            },
            "generic_type" => match node.child_by_field_name("type") {
                Some(inner) => self.lower_type(&inner),
                None => TypeExpr::Other,
            },
            "parenthesized_type" => match named_children(node).first() {
                Some(inner) => self.lower_type(inner),
                None => TypeExpr::Other,
            },
            _ => TypeExpr::Other,
        }
    }

    fn lower_type_spec(&mut self, node: &TSNode) -> TypeSpec {
        let name = match node.child_by_field_name("name") {
            Some(n) => self.ident(&n),
            None => Ident {
                id: self.next_id(),
                name: String::new(),
                span: node_to_span(node),
            },
        };
        let kind = match node.child_by_field_name("type") {
            Some(ty) if ty.kind() == "struct_type" => TypeSpecKind::Struct(self.lower_fields(&ty)),
            Some(ty) if ty.kind() == "interface_type" => {
                let mut methods = Vec::new();
                for elem in named_children(&ty) {
                    if matches!(elem.kind(), "method_elem" | "method_spec") {
                        if let Some(n) = elem.child_by_field_name("name") {
                            methods.push(self.ident(&n));
                        }
                    }
                }
                TypeSpecKind::Interface(methods)
            }
            Some(ty) => TypeSpecKind::Other(self.lower_type(&ty)),
            None => TypeSpecKind::Other(TypeExpr::Other),
        };
        TypeSpec {
            name,
            kind,
            span: node_to_span(node),
        }
    }

    fn lower_fields(&mut self, struct_type: &TSNode) -> Vec<FieldDecl> {
        let Some(list) = find_child_by_kind(struct_type, "field_declaration_list") else {
            return Vec::new();
        };
        let mut fields = Vec::new();
        for decl in named_children(&list) {
            if decl.kind() != "field_declaration" {
                continue;
            }
            let names: Vec<Ident> = field_children(&decl, "name")
                .iter()
                .map(|n| self.ident(n))
                .collect();
            let mut ty = decl
                .child_by_field_name("type")
                .map(|t| self.lower_type(&t))
                .unwrap_or(TypeExpr::Other);
            // Embedded `*T` keeps the star as an anonymous sibling of the type
            if names.is_empty() && has_child_kind(&decl, "*") {
                ty = TypeExpr::Pointer(Box::new(ty));
            }
            fields.push(FieldDecl { names, ty });
        }
        fields
    }

    fn lower_value_specs(&mut self, node: &TSNode) -> Vec<ValueSpec> {
        let mut specs = Vec::new();
        for child in named_children(node) {
            match child.kind() {
                "var_spec" | "const_spec" => specs.push(self.lower_value_spec(&child)),
                "var_spec_list" | "const_spec_list" => specs.extend(self.lower_value_specs(&child)),
                _ => {}
            }
        }
        specs
    }

    fn lower_value_spec(&mut self, node: &TSNode) -> ValueSpec {
        let id = self.next_id();
        let names = field_children(node, "name")
            .iter()
            .map(|n| self.ident(n))
            .collect();
        let ty = node
            .child_by_field_name("type")
            .map(|t| self.lower_type(&t));
        let values = node
            .child_by_field_name("value")
            .map(|v| self.lower_expr_list(&v))
            .unwrap_or_default();
        ValueSpec {
            id,
            names,
            ty,
            values,
            span: node_to_span(node),
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Statements
    // ═══════════════════════════════════════════════════════════════════

    fn lower_block(&mut self, node: &TSNode) -> Block {
        let mut stmts = Vec::new();
        for child in named_children(node) {
            self.lower_stmt_into(&child, &mut stmts);
        }
        Block {
            stmts,
            span: node_to_span(node),
        }
    }

    fn lower_stmt_into(&mut self, node: &TSNode, out: &mut Vec<Stmt>) {
        match node.kind() {
            "statement_list" => {
                for child in named_children(node) {
                    self.lower_stmt_into(&child, out);
                }
            }
            "labeled_statement" => {
                for child in named_children(node) {
                    if child.kind() != "label_name" {
                        self.lower_stmt_into(&child, out);
                    }
                }
            }
            "expression_statement" => {
                if let Some(expr) = named_children(node).first() {
                    out.push(Stmt::Expr(self.lower_expr(expr)));
                }
            }
            "short_var_declaration" | "assignment_statement" => {
                let define = node.kind() == "short_var_declaration";
                out.push(self.lower_assign(node, define));
            }
            "range_clause" | "receive_statement" => {
                let define = has_child_kind(node, ":=");
                match node.child_by_field_name("left") {
                    Some(_) => out.push(self.lower_assign(node, define)),
                    None => {
                        if let Some(right) = node.child_by_field_name("right") {
                            out.push(Stmt::Expr(self.lower_expr(&right)));
                        }
                    }
                }
            }
            "defer_statement" | "go_statement" => {
                let Some(inner) = named_children(node).into_iter().next() else {
                    return;
                };
                let span = node_to_span(node);
                match self.lower_expr(&inner) {
                    Expr::Call(call) if node.kind() == "defer_statement" => {
                        out.push(Stmt::Defer(DeferStmt { call: *call, span }))
                    }
                    Expr::Call(call) => out.push(Stmt::Go(GoStmt { call: *call, span })),
                    other => out.push(Stmt::Expr(other)),
                }
            }
            "return_statement" => {
                let results = named_children(node)
                    .first()
                    .map(|list| self.lower_expr_list(list))
                    .unwrap_or_default();
                out.push(Stmt::Return(ReturnStmt {
                    results,
                    span: node_to_span(node),
                }));
            }
            "var_declaration" | "const_declaration" => {
                for spec in self.lower_value_specs(node) {
                    out.push(Stmt::Var(spec));
                }
            }
            "block" => out.push(Stmt::Block(self.lower_block(node))),
            "type_switch_statement" => out.push(self.lower_type_switch(node)),
            "empty_statement" | "break_statement" | "continue_statement" | "goto_statement"
            | "fallthrough_statement" | "type_declaration" | "comment" => {}
            kind if is_statement_kind(kind) => out.push(self.lower_compound(node)),
            // Bare expression in statement position (conditions, case values)
            _ => out.push(Stmt::Expr(self.lower_expr(node))),
        }
    }

    fn lower_assign(&mut self, node: &TSNode, define: bool) -> Stmt {
        let id = self.next_id();
        let lhs = node
            .child_by_field_name("left")
            .map(|l| self.lower_expr_list(&l))
            .unwrap_or_default();
        let rhs = node
            .child_by_field_name("right")
            .map(|r| self.lower_expr_list(&r))
            .unwrap_or_default();
        Stmt::Assign(AssignStmt {
            id,
            lhs,
            rhs,
            define,
            span: node_to_span(node),
        })
    }

    fn lower_compound(&mut self, node: &TSNode) -> Stmt {
        let mut children = Vec::new();
        for child in named_children(node) {
            self.lower_stmt_into(&child, &mut children);
        }
        Stmt::Compound(CompoundStmt {
            kind: node.kind().to_string(),
            children,
            span: node_to_span(node),
        })
    }

    /// `switch v := x.(type)` binds `v` for the whole switch
    fn lower_type_switch(&mut self, node: &TSNode) -> Stmt {
        let mut children = Vec::new();
        if let Some(init) = node.child_by_field_name("initializer") {
            self.lower_stmt_into(&init, &mut children);
        }
        let value = node.child_by_field_name("value").map(|v| self.lower_expr(&v));
        match (node.child_by_field_name("alias"), value) {
            (Some(alias), Some(value)) => {
                let id = self.next_id();
                let lhs = self.lower_expr_list(&alias);
                children.push(Stmt::Assign(AssignStmt {
                    id,
                    lhs,
                    rhs: vec![value],
                    define: true,
                    span: node_to_span(&alias),
                }));
            }
            (None, Some(value)) => children.push(Stmt::Expr(value)),
            _ => {}
        }
        for case in named_children(node) {
            if matches!(case.kind(), "type_case" | "default_case") {
                children.push(self.lower_compound(&case));
            }
        }
        Stmt::Compound(CompoundStmt {
            kind: node.kind().to_string(),
            children,
            span: node_to_span(node),
        })
    }

    // ═══════════════════════════════════════════════════════════════════
    // Expressions
    // ═══════════════════════════════════════════════════════════════════

    fn lower_expr_list(&mut self, node: &TSNode) -> Vec<Expr> {
        if node.kind() == "expression_list" {
            named_children(node)
                .iter()
                .map(|child| self.lower_expr(child))
                .collect()
        } else {
            vec![self.lower_expr(node)]
        }
    }

    fn lower_expr(&mut self, node: &TSNode) -> Expr {
        let span = node_to_span(node);
        match node.kind() {
            "identifier" | "type_identifier" | "field_identifier" | "package_identifier" => {
                Expr::Ident(self.ident(node))
            }
            "selector_expression" => {
                let id = self.next_id();
                let (Some(operand), Some(field)) = (
                    node.child_by_field_name("operand"),
                    node.child_by_field_name("field"),
                ) else {
                    return self.lower_other(node);
                };
                let base = self.lower_expr(&operand);
                let sel = self.ident(&field);
                Expr::Selector(Box::new(SelectorExpr {
                    id,
                    base,
                    sel,
                    span,
                }))
            }
            "call_expression" => {
                let id = self.next_id();
                let Some(function) = node.child_by_field_name("function") else {
                    return self.lower_other(node);
                };
                let fun = self.lower_expr(&function);
                let args = node
                    .child_by_field_name("arguments")
                    .map(|list| {
                        named_children(&list)
                            .iter()
                            .map(|arg| self.lower_expr(arg))
                            .collect()
                    })
                    .unwrap_or_default();
                Expr::Call(Box::new(CallExpr {
                    id,
                    fun,
                    args,
                    span,
                }))
            }
            "func_literal" => {
                let id = self.next_id();
                let params = node
                    .child_by_field_name("parameters")
                    .map(|list| self.lower_params(&list))
                    .unwrap_or_default();
                let result = node
                    .child_by_field_name("result")
                    .and_then(|r| self.lower_result(&r));
                let body = match node.child_by_field_name("body") {
                    Some(b) => self.lower_block(&b),
                    None => Block {
                        stmts: Vec::new(),
                        span,
                    },
                };
                Expr::FuncLit(Box::new(FuncLit {
                    id,
                    params,
                    result,
                    body,
                    span,
                }))
            }
            "parenthesized_expression" => match named_children(node).first() {
                Some(inner) => Expr::Paren(Box::new(ParenExpr {
                    inner: self.lower_expr(inner),
                    span,
                })),
                None => self.lower_other(node),
            },
            "unary_expression" => {
                let op = node
                    .child_by_field_name("operator")
                    .map(|o| self.text(&o).to_string())
                    .unwrap_or_default();
                match node.child_by_field_name("operand") {
                    Some(operand) => Expr::Unary(Box::new(UnaryExpr {
                        op,
                        operand: self.lower_expr(&operand),
                        span,
                    })),
                    None => self.lower_other(node),
                }
            }
            "composite_literal" => {
                let ty = node
                    .child_by_field_name("type")
                    .map(|t| self.lower_type(&t))
                    .unwrap_or(TypeExpr::Other);
                let elems = node
                    .child_by_field_name("body")
                    .map(|body| self.lower_literal_value(&body))
                    .unwrap_or_default();
                Expr::Composite(Box::new(CompositeLit { ty, elems, span }))
            }
            "literal_value" => Expr::Other(OtherExpr {
                kind: node.kind().to_string(),
                children: self.lower_literal_value(node),
                span,
            }),
            "literal_element" | "element" => match named_children(node).first() {
                Some(inner) => self.lower_expr(inner),
                None => self.lower_other(node),
            },
            // Keys are field names or constants; only the value can hold calls
            "keyed_element" => match named_children(node).last() {
                Some(value) => self.lower_expr(value),
                None => self.lower_other(node),
            },
            _ => self.lower_other(node),
        }
    }

    fn lower_literal_value(&mut self, node: &TSNode) -> Vec<Expr> {
        named_children(node)
            .iter()
            .map(|elem| self.lower_expr(elem))
            .collect()
    }

    fn lower_other(&mut self, node: &TSNode) -> Expr {
        let children = named_children(node)
            .iter()
            .map(|child| self.lower_expr(child))
            .collect();
        Expr::Other(OtherExpr {
            kind: node.kind().to_string(),
            children,
            span: node_to_span(node),
        })
    }
}

/// Kinds lowered as statements inside compound statements
fn is_statement_kind(kind: &str) -> bool {
    kind.ends_with("_statement")
        || kind.ends_with("_declaration")
        || matches!(
            kind,
            "block"
                | "statement_list"
                | "for_clause"
                | "range_clause"
                | "expression_case"
                | "default_case"
                | "communication_case"
                | "type_case"
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Parser;

    fn lower(source: &str) -> SourceFile {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_go::language()).unwrap();
        let tree = parser.parse(source, None).unwrap();
        GoLowering::new(source, FileId(0)).lower_file(&tree.root_node(), "main.go", ".")
    }

    fn only_func(file: &SourceFile) -> &FuncDecl {
        file.decls
            .iter()
            .find_map(|d| match d {
                Decl::Func(f) => Some(f),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn test_package_and_imports() {
        let file = lower(
            r#"
package store

import (
    "sync"
    m "example.com/pkg/metrics"
)
"#,
        );
        assert_eq!(file.package, "store");
        assert_eq!(file.imports.len(), 2);
        assert_eq!(file.imports[0].local_name(), "sync");
        assert_eq!(file.imports[1].local_name(), "m");
        assert_eq!(file.imports[1].path, "example.com/pkg/metrics");
    }

    #[test]
    fn test_method_receiver_and_calls() {
        let file = lower(
            r#"
package main

func (s *Store) Get(key string) int {
    s.mu.RLock()
    defer s.mu.RUnlock()
    return s.get(key)
}
"#,
        );
        let func = only_func(&file);
        assert_eq!(func.name.name, "Get");
        let receiver = func.receiver.as_ref().unwrap();
        assert_eq!(receiver.name.as_ref().unwrap().name, "s");
        assert_eq!(
            receiver.ty,
            TypeExpr::Pointer(Box::new(TypeExpr::Name("Store".to_string())))
        );

        let body = func.body.as_ref().unwrap();
        assert_eq!(body.stmts.len(), 3);
        assert!(matches!(&body.stmts[0], Stmt::Expr(Expr::Call(_))));
        match &body.stmts[1] {
            Stmt::Defer(defer) => match &defer.call.fun {
                Expr::Selector(sel) => assert_eq!(sel.sel.name, "RUnlock"),
                other => panic!("unexpected callee {:?}", other),
            },
            other => panic!("expected defer, got {:?}", other),
        }
        assert!(matches!(&body.stmts[2], Stmt::Return(r) if r.results.len() == 1));
    }

    #[test]
    fn test_struct_fields_and_embedding() {
        let file = lower(
            r#"
package main

import "sync"

type Cache struct {
    *sync.RWMutex
    items map[string]int
    a, b int
}
"#,
        );
        let spec = file
            .decls
            .iter()
            .find_map(|d| match d {
                Decl::Type(t) => Some(t),
                _ => None,
            })
            .unwrap();
        let TypeSpecKind::Struct(fields) = &spec.kind else {
            panic!("expected struct");
        };
        assert_eq!(fields.len(), 3);
        assert!(fields[0].is_embedded());
        assert_eq!(
            fields[0].ty,
            TypeExpr::Pointer(Box::new(TypeExpr::Qualified {
                package: "sync".to_string(),
                name: "RWMutex".to_string(),
            }))
        );
        assert_eq!(fields[2].names.len(), 2);
    }

    #[test]
    fn test_closure_assignment_and_compound() {
        let file = lower(
            r#"
package main

func run(items []int) {
    f := func() { helper() }
    for _, it := range items {
        if it > 0 {
            f()
        }
    }
}
"#,
        );
        let body = only_func(&file).body.as_ref().unwrap();
        match &body.stmts[0] {
            Stmt::Assign(assign) => {
                assert!(assign.define);
                assert!(matches!(assign.rhs[0], Expr::FuncLit(_)));
            }
            other => panic!("expected assignment, got {:?}", other),
        }
        match &body.stmts[1] {
            Stmt::Compound(compound) => {
                assert_eq!(compound.kind, "for_statement");
                assert!(compound
                    .children
                    .iter()
                    .any(|s| matches!(s, Stmt::Assign(a) if a.define && a.lhs.len() == 2)));
            }
            other => panic!("expected for statement, got {:?}", other),
        }
    }

    #[test]
    fn test_package_var_with_closure_value() {
        let file = lower(
            r#"
package main

var (
    mu   sync.RWMutex
    work = func() { mu.RLock() }
)
"#,
        );
        let specs: Vec<&ValueSpec> = file
            .decls
            .iter()
            .filter_map(|d| match d {
                Decl::Var(v) => Some(v),
                _ => None,
            })
            .collect();
        assert_eq!(specs.len(), 2);
        assert!(specs[0].values.is_empty());
        assert!(matches!(specs[1].values[0], Expr::FuncLit(_)));
    }
}
