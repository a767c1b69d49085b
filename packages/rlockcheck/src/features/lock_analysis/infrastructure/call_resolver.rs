//! Call-target resolution
//!
//! Maps a call site to the identity of what it statically invokes. Interface
//! dispatch, builtins, and conversions are unresolved.

use tracing::trace;

use crate::config::LockConfig;
use crate::features::lock_analysis::domain::CalleeIdentity;
use crate::features::syntax::domain::{CallExpr, Expr, SymbolKind, TypeRef};
use crate::features::syntax::ports::TypeOracle;

pub struct CallResolver<'s> {
    oracle: &'s dyn TypeOracle,
    lock: &'s LockConfig,
}

impl<'s> CallResolver<'s> {
    pub fn new(oracle: &'s dyn TypeOracle, lock: &'s LockConfig) -> Self {
        Self { oracle, lock }
    }

    pub fn resolve(&self, call: &CallExpr) -> Option<CalleeIdentity> {
        let fun = call.fun.unparen();
        let symbol_id = match fun {
            Expr::Ident(ident) => self.oracle.object_of(ident),
            Expr::Selector(sel) => self.oracle.selection(sel),
            Expr::FuncLit(lit) => {
                return Some(CalleeIdentity::literal(
                    lit.id.file.0,
                    lit.span.start_byte,
                    lit.span.start_line,
                ));
            }
            _ => None,
        };
        let Some(symbol_id) = symbol_id else {
            trace!(line = call.span.start_line, "callee unresolved");
            return None;
        };
        let symbol = self.oracle.symbol(symbol_id)?;

        match &symbol.kind {
            SymbolKind::Func => Some(CalleeIdentity::function(symbol.package, &symbol.name)),
            SymbolKind::Method { receiver } => {
                if self.oracle.is_interface(receiver) {
                    return None;
                }
                Some(CalleeIdentity::method(
                    symbol.package,
                    &symbol.name,
                    receiver.clone(),
                    &receiver_name(receiver),
                ))
            }
            SymbolKind::Var(_) | SymbolKind::Field => match symbol.ty {
                TypeRef::Func { .. } | TypeRef::Unknown => Some(CalleeIdentity::value(
                    symbol.package,
                    &symbol.name,
                    symbol_id,
                )),
                _ => None,
            },
            SymbolKind::InterfaceMethod { .. }
            | SymbolKind::Builtin
            | SymbolKind::TypeName
            | SymbolKind::Package(_) => None,
        }
    }

    pub fn is_acquire(&self, identity: &CalleeIdentity) -> bool {
        identity.is_declared() && identity.name == self.lock.acquire
    }

    pub fn is_release(&self, identity: &CalleeIdentity) -> bool {
        identity.is_declared() && identity.name == self.lock.release
    }

    pub fn oracle(&self) -> &'s dyn TypeOracle {
        self.oracle
    }
}

/// Bare type name of a receiver, pointer stripped
fn receiver_name(receiver: &TypeRef) -> String {
    match receiver.deref() {
        TypeRef::Named(named) => named.name.clone(),
        _ => "?".to_string(),
    }
}
