//! Declaration locator
//!
//! Finds the body a resolved callee runs: a function or method declaration,
//! or a closure literal reached directly or through simple variable bindings.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

use crate::features::lock_analysis::domain::CalleeIdentity;
use crate::features::syntax::domain::{CallExpr, Expr, FuncDecl, FuncLit, Ident, SymbolId, SymbolKind};
use crate::features::syntax::infrastructure::Inspector;
use crate::features::syntax::ports::TypeOracle;

/// Upper bound on `g := f; h := g` chains followed when resolving a closure
const MAX_BINDING_DEPTH: usize = 16;

/// Function and method declarations keyed by [`CalleeIdentity::key`], plus
/// the variables assigned again after their declaration
pub struct DeclIndex<'p> {
    by_key: FxHashMap<String, &'p FuncDecl>,
    reassigned: FxHashSet<SymbolId>,
}

impl<'p> DeclIndex<'p> {
    pub fn build(inspector: &Inspector<'p>, oracle: &dyn TypeOracle) -> Self {
        let mut by_key = FxHashMap::default();
        for &func in inspector.functions() {
            let Some(identity) = declared_identity(func, oracle) else {
                trace!(name = %func.name.name, "declaration without a symbol");
                continue;
            };
            // First declaration wins; Go forbids duplicates anyway
            by_key.entry(identity.key()).or_insert(func);
        }

        let mut reassigned = FxHashSet::default();
        for &assign in inspector.assignments() {
            for lhs in &assign.lhs {
                let Expr::Ident(ident) = lhs.unparen() else {
                    continue;
                };
                let Some(symbol) = oracle.object_of(ident) else {
                    continue;
                };
                if oracle.symbol(symbol).and_then(|s| s.decl) != Some(assign.id) {
                    reassigned.insert(symbol);
                }
            }
        }
        Self { by_key, reassigned }
    }

    pub fn get(&self, identity: &CalleeIdentity) -> Option<&'p FuncDecl> {
        if !identity.is_declared() {
            return None;
        }
        self.by_key.get(&identity.key()).copied()
    }

    /// Assigned somewhere other than its declaring statement
    pub fn is_reassigned(&self, symbol: SymbolId) -> bool {
        self.reassigned.contains(&symbol)
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

/// Identity under which a declaration is called
pub fn declared_identity(func: &FuncDecl, oracle: &dyn TypeOracle) -> Option<CalleeIdentity> {
    let symbol = oracle.symbol(oracle.object_of(&func.name)?)?;
    match &symbol.kind {
        SymbolKind::Func => Some(CalleeIdentity::function(symbol.package, &func.name.name)),
        SymbolKind::Method { .. } => {
            let receiver = oracle.receiver_type(func)?;
            let receiver_name = receiver
                .deref()
                .as_named()
                .map(|n| n.name.clone())
                .unwrap_or_else(|| "?".to_string());
            Some(CalleeIdentity::method(
                symbol.package,
                &func.name.name,
                receiver.clone(),
                &receiver_name,
            ))
        }
        _ => None,
    }
}

pub struct DeclLocator<'s, 'p> {
    index: &'s DeclIndex<'p>,
    inspector: &'s Inspector<'p>,
    oracle: &'s dyn TypeOracle,
}

impl<'s, 'p> DeclLocator<'s, 'p> {
    pub fn new(
        index: &'s DeclIndex<'p>,
        inspector: &'s Inspector<'p>,
        oracle: &'s dyn TypeOracle,
    ) -> Self {
        Self {
            index,
            inspector,
            oracle,
        }
    }

    /// Declaration for a resolved function or method identity
    pub fn find(&self, identity: &CalleeIdentity) -> Option<&'p FuncDecl> {
        self.index.get(identity)
    }

    /// Closure literal a call invokes, if it can be determined syntactically.
    ///
    /// Follows `f := func() {...}` and `var f = func() {...}` bindings through
    /// any number of plain renames. Multi-value bindings whose sides differ in
    /// length are not followed, nor are variables assigned again later.
    pub fn closure_literal(&self, call: &'p CallExpr) -> Option<&'p FuncLit> {
        self.literal_of(&call.fun, 0)
    }

    fn literal_of(&self, expr: &'p Expr, depth: usize) -> Option<&'p FuncLit> {
        match expr.unparen() {
            Expr::FuncLit(lit) => Some(&**lit),
            Expr::Ident(ident) if depth < MAX_BINDING_DEPTH => self.bound_literal(ident, depth),
            _ => None,
        }
    }

    fn bound_literal(&self, ident: &Ident, depth: usize) -> Option<&'p FuncLit> {
        let symbol_id = self.oracle.object_of(ident)?;
        if self.index.is_reassigned(symbol_id) {
            trace!(name = %ident.name, "reassigned variable, closure not followed");
            return None;
        }
        let decl = self.oracle.symbol(symbol_id)?.decl?;
        let binding = self.inspector.binding(decl)?;
        if binding.lhs_len() != binding.rhs().len() {
            trace!(name = %ident.name, "unbalanced binding, closure not followed");
            return None;
        }
        let position = binding
            .names()
            .iter()
            .position(|name| name.and_then(|n| self.oracle.object_of(n)) == Some(symbol_id))?;
        self.literal_of(&binding.rhs()[position], depth + 1)
    }
}
