//! Program inspector
//!
//! Pre-order node streams for lock tracking, plus a declaration index so
//! closure bindings can be followed from a symbol's declaring statement.

use rustc_hash::FxHashMap;

use crate::features::syntax::domain::{
    AssignStmt, Block, CallExpr, Decl, DeferStmt, Expr, FuncDecl, FuncLit, Ident, NodeId, Program,
    ReturnStmt, Stmt, ValueSpec,
};
use crate::shared::models::Span;

/// Statement that introduced a variable
#[derive(Debug, Clone, Copy)]
pub enum Binding<'p> {
    Assign(&'p AssignStmt),
    ValueSpec(&'p ValueSpec),
}

impl<'p> Binding<'p> {
    pub fn lhs_len(&self) -> usize {
        match self {
            Binding::Assign(assign) => assign.lhs.len(),
            Binding::ValueSpec(spec) => spec.names.len(),
        }
    }

    pub fn rhs(&self) -> &'p [Expr] {
        match self {
            Binding::Assign(assign) => &assign.rhs,
            Binding::ValueSpec(spec) => &spec.values,
        }
    }

    /// Bound identifiers in left-hand order; `None` where the target is not a plain name
    pub fn names(&self) -> Vec<Option<&'p Ident>> {
        match self {
            Binding::Assign(assign) => assign
                .lhs
                .iter()
                .map(|e| match e.unparen() {
                    Expr::Ident(ident) => Some(ident),
                    _ => None,
                })
                .collect(),
            Binding::ValueSpec(spec) => spec.names.iter().map(Some).collect(),
        }
    }
}

/// Node kinds the lock tracker reacts to
#[derive(Debug, Clone, Copy)]
pub enum TraversalNode<'p> {
    FuncDecl(&'p FuncDecl),
    FuncLit(&'p FuncLit),
    Call(&'p CallExpr),
    Defer(&'p DeferStmt),
    Return(&'p ReturnStmt),
}

impl<'p> TraversalNode<'p> {
    pub fn span(&self) -> Span {
        match self {
            TraversalNode::FuncDecl(decl) => decl.span,
            TraversalNode::FuncLit(lit) => lit.span,
            TraversalNode::Call(call) => call.span,
            TraversalNode::Defer(defer) => defer.span,
            TraversalNode::Return(ret) => ret.span,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            TraversalNode::FuncDecl(_) => "func_decl",
            TraversalNode::FuncLit(_) => "func_lit",
            TraversalNode::Call(_) => "call",
            TraversalNode::Defer(_) => "defer",
            TraversalNode::Return(_) => "return",
        }
    }
}

pub struct Inspector<'p> {
    program: &'p Program,
    functions: Vec<&'p FuncDecl>,
    bindings: FxHashMap<NodeId, Binding<'p>>,
    assignments: Vec<&'p AssignStmt>,
}

impl<'p> Inspector<'p> {
    pub fn new(program: &'p Program) -> Self {
        let mut inspector = Self {
            program,
            functions: Vec::new(),
            bindings: FxHashMap::default(),
            assignments: Vec::new(),
        };
        for file in &program.files {
            for decl in &file.decls {
                match decl {
                    Decl::Func(func) => {
                        inspector.functions.push(func);
                        if let Some(body) = &func.body {
                            inspector.index_block(body);
                        }
                    }
                    Decl::Var(spec) => inspector.index_value_spec(spec),
                    Decl::Type(_) => {}
                }
            }
        }
        inspector
    }

    pub fn program(&self) -> &'p Program {
        self.program
    }

    /// Every function and method declaration, in file order
    pub fn functions(&self) -> &[&'p FuncDecl] {
        &self.functions
    }

    /// Declaring statement recorded under `decl`
    pub fn binding(&self, decl: NodeId) -> Option<Binding<'p>> {
        self.bindings.get(&decl).copied()
    }

    /// Every assignment statement, defining or not, in file order
    pub fn assignments(&self) -> &[&'p AssignStmt] {
        &self.assignments
    }

    /// Pre-order stream of a function declaration, starting with the declaration itself
    pub fn preorder(&self, func: &'p FuncDecl) -> Vec<TraversalNode<'p>> {
        let mut out = vec![TraversalNode::FuncDecl(func)];
        if let Some(body) = &func.body {
            walk_block(body, &mut out);
        }
        out
    }

    /// Pre-order stream of a closure activation, starting with the literal itself
    pub fn preorder_closure(&self, lit: &'p FuncLit) -> Vec<TraversalNode<'p>> {
        let mut out = vec![TraversalNode::FuncLit(lit)];
        walk_block(&lit.body, &mut out);
        out
    }

    /// Calls in a block in pre-order, skipping closure literal bodies
    pub fn calls_in(&self, block: &'p Block) -> Vec<&'p CallExpr> {
        let mut nodes = Vec::new();
        walk_block(block, &mut nodes);

        let mut calls = Vec::new();
        let mut closure_end: Option<u32> = None;
        for node in nodes {
            let span = node.span();
            if let Some(end) = closure_end {
                if span.start_byte < end {
                    continue;
                }
                closure_end = None;
            }
            match node {
                TraversalNode::FuncLit(lit) => closure_end = Some(lit.span.end_byte),
                TraversalNode::Call(call) => calls.push(call),
                _ => {}
            }
        }
        calls
    }

    // ───────────────────────────── indexing ─────────────────────────────

    fn index_value_spec(&mut self, spec: &'p ValueSpec) {
        self.bindings.insert(spec.id, Binding::ValueSpec(spec));
        for value in &spec.values {
            self.index_expr(value);
        }
    }

    fn index_block(&mut self, block: &'p Block) {
        for stmt in &block.stmts {
            self.index_stmt(stmt);
        }
    }

    fn index_stmt(&mut self, stmt: &'p Stmt) {
        match stmt {
            Stmt::Expr(expr) => self.index_expr(expr),
            Stmt::Defer(defer) => self.index_call(&defer.call),
            Stmt::Go(go) => self.index_call(&go.call),
            Stmt::Return(ret) => ret.results.iter().for_each(|e| self.index_expr(e)),
            Stmt::Assign(assign) => {
                self.bindings.insert(assign.id, Binding::Assign(assign));
                self.assignments.push(assign);
                assign.lhs.iter().for_each(|e| self.index_expr(e));
                assign.rhs.iter().for_each(|e| self.index_expr(e));
            }
            Stmt::Var(spec) => self.index_value_spec(spec),
            Stmt::Block(block) => self.index_block(block),
            Stmt::Compound(compound) => compound.children.iter().for_each(|s| self.index_stmt(s)),
        }
    }

    fn index_call(&mut self, call: &'p CallExpr) {
        self.index_expr(&call.fun);
        call.args.iter().for_each(|e| self.index_expr(e));
    }

    fn index_expr(&mut self, expr: &'p Expr) {
        match expr {
            Expr::Ident(_) => {}
            Expr::Selector(sel) => self.index_expr(&sel.base),
            Expr::Call(call) => self.index_call(call),
            Expr::FuncLit(lit) => self.index_block(&lit.body),
            Expr::Paren(paren) => self.index_expr(&paren.inner),
            Expr::Unary(unary) => self.index_expr(&unary.operand),
            Expr::Composite(lit) => lit.elems.iter().for_each(|e| self.index_expr(e)),
            Expr::Other(other) => other.children.iter().for_each(|e| self.index_expr(e)),
        }
    }
}

// ───────────────────────────── pre-order walk ─────────────────────────────

fn walk_block<'p>(block: &'p Block, out: &mut Vec<TraversalNode<'p>>) {
    for stmt in &block.stmts {
        walk_stmt(stmt, out);
    }
}

fn walk_stmt<'p>(stmt: &'p Stmt, out: &mut Vec<TraversalNode<'p>>) {
    match stmt {
        Stmt::Expr(expr) => walk_expr(expr, out),
        Stmt::Defer(defer) => {
            out.push(TraversalNode::Defer(defer));
            walk_call(&defer.call, out);
        }
        Stmt::Go(go) => walk_call(&go.call, out),
        Stmt::Return(ret) => {
            out.push(TraversalNode::Return(ret));
            ret.results.iter().for_each(|e| walk_expr(e, out));
        }
        Stmt::Assign(assign) => {
            assign.lhs.iter().for_each(|e| walk_expr(e, out));
            assign.rhs.iter().for_each(|e| walk_expr(e, out));
        }
        Stmt::Var(spec) => spec.values.iter().for_each(|e| walk_expr(e, out)),
        Stmt::Block(block) => walk_block(block, out),
        Stmt::Compound(compound) => compound.children.iter().for_each(|s| walk_stmt(s, out)),
    }
}

fn walk_call<'p>(call: &'p CallExpr, out: &mut Vec<TraversalNode<'p>>) {
    out.push(TraversalNode::Call(call));
    walk_expr(&call.fun, out);
    call.args.iter().for_each(|e| walk_expr(e, out));
}

fn walk_expr<'p>(expr: &'p Expr, out: &mut Vec<TraversalNode<'p>>) {
    match expr {
        Expr::Ident(_) => {}
        Expr::Selector(sel) => walk_expr(&sel.base, out),
        Expr::Call(call) => walk_call(call, out),
        Expr::FuncLit(lit) => {
            out.push(TraversalNode::FuncLit(lit));
            walk_block(&lit.body, out);
        }
        Expr::Paren(paren) => walk_expr(&paren.inner, out),
        Expr::Unary(unary) => walk_expr(&unary.operand, out),
        Expr::Composite(lit) => lit.elems.iter().for_each(|e| walk_expr(e, out)),
        Expr::Other(other) => other.children.iter().for_each(|e| walk_expr(e, out)),
    }
}
