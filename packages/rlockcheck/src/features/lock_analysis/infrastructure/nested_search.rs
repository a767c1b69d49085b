//! Nested-lock search
//!
//! Once a lock is held, every call made under it is followed into the code
//! it runs, looking for a second acquisition of the same lock. The lock path
//! is rewritten at each callee boundary so that it is spelled the way the
//! callee reaches the lock.
//!
//! The walk is a depth-first search with an explicit stack. The cycle guard
//! holds the identities of the frames currently on the stack, so independent
//! branches never prune each other.

use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use crate::config::SearchConfig;
use crate::features::lock_analysis::domain::{AccessPath, CalleeIdentity, PathNode, StackFrame};
use crate::features::lock_analysis::infrastructure::call_resolver::CallResolver;
use crate::features::lock_analysis::infrastructure::decl_locator::DeclLocator;
use crate::features::syntax::domain::{CallExpr, Expr, FuncDecl};
use crate::features::syntax::infrastructure::Inspector;
use crate::shared::models::SourceLocation;

/// A callee the search has entered
struct Frame<'p> {
    key: String,
    /// Lock path as seen from inside the callee
    path: AccessPath,
    calls: Vec<&'p CallExpr>,
    next: usize,
    /// Call that entered this frame
    site: StackFrame,
}

pub struct NestedSearch<'a, 'p> {
    inspector: &'a Inspector<'p>,
    resolver: &'a CallResolver<'a>,
    locator: &'a DeclLocator<'a, 'p>,
    config: SearchConfig,
}

impl<'a, 'p> NestedSearch<'a, 'p> {
    pub fn new(
        inspector: &'a Inspector<'p>,
        resolver: &'a CallResolver<'a>,
        locator: &'a DeclLocator<'a, 'p>,
        config: SearchConfig,
    ) -> Self {
        Self {
            inspector,
            resolver,
            locator,
            config,
        }
    }

    /// Call stack leading from `call` to a second acquisition of `lock`, or
    /// `None` if no such path can be proven.
    pub fn search(&self, lock: &AccessPath, call: &'p CallExpr) -> Option<Vec<StackFrame>> {
        let root = self.enter(lock, call)?;
        debug!(
            lock = %lock.describe_target(),
            callee = %root.site.callee_name,
            "nested search started"
        );

        let mut stack = vec![root];
        let mut history: FxHashSet<String> = FxHashSet::default();

        while let Some(top) = stack.last_mut() {
            let Some(&inner) = top.calls.get(top.next) else {
                if let Some(done) = stack.pop() {
                    // The root frame was never recorded
                    if !stack.is_empty() {
                        history.remove(&done.key);
                    }
                }
                continue;
            };
            top.next += 1;

            let inner_path = AccessPath::build(&inner.fun, self.resolver.oracle());
            if inner_path
                .as_ref()
                .is_some_and(|p| p.equal(&top.path, 0))
            {
                let name = self
                    .resolver
                    .resolve(inner)
                    .map(|id| id.display)
                    .or_else(|| inner_path.as_ref().map(|p| p.last().name.clone()))
                    .unwrap_or_default();
                let mut frames: Vec<StackFrame> =
                    stack.iter().map(|frame| frame.site.clone()).collect();
                frames.push(StackFrame::new(name, self.location(inner)));
                debug!(depth = frames.len(), "nested acquisition found");
                return Some(frames);
            }

            if self
                .resolver
                .resolve(inner)
                .is_some_and(|id| self.resolver.is_release(&id))
            {
                continue;
            }

            let carried = top.path.clone();
            let Some(child) = self.enter(&carried, inner) else {
                continue;
            };
            if history.contains(&child.key) {
                trace!(key = %child.key, "already on the search path");
                continue;
            }
            history.insert(child.key.clone());
            stack.push(child);
        }
        None
    }

    /// Enter the code `call` runs, carrying `lock` across the boundary
    fn enter(&self, lock: &AccessPath, call: &'p CallExpr) -> Option<Frame<'p>> {
        let identity = self.resolver.resolve(call);

        if let Some(lit) = self.locator.closure_literal(call) {
            let literal =
                CalleeIdentity::literal(lit.id.file.0, lit.span.start_byte, lit.span.start_line);
            let name = identity.map(|id| id.display).unwrap_or(literal.display.clone());
            return Some(Frame {
                key: literal.key(),
                path: lock.clone(),
                calls: self.inspector.calls_in(&lit.body),
                next: 0,
                site: StackFrame::new(name, self.location(call)),
            });
        }

        let identity = identity?;
        let decl = self.locator.find(&identity)?;
        let body = decl.body.as_ref()?;
        let Some(path) = self.carry(lock, call, decl) else {
            trace!(callee = %identity.display, "lock not reachable from callee");
            return None;
        };
        Some(Frame {
            key: identity.key(),
            path,
            calls: self.inspector.calls_in(body),
            next: 0,
            site: StackFrame::new(identity.display, self.location(call)),
        })
    }

    /// Spell `lock` from inside `decl`, or `None` if the callee cannot reach it
    fn carry(&self, lock: &AccessPath, call: &CallExpr, decl: &FuncDecl) -> Option<AccessPath> {
        let oracle = self.resolver.oracle();

        if let Some(recv) = decl.receiver.as_ref().and_then(|r| r.name.as_ref()) {
            let through_receiver = AccessPath::build(&call.fun, oracle)
                .and_then(|call_path| lock.suffix(&call_path))
                .zip(oracle.object_of(recv));
            if let Some((suffix, symbol)) = through_receiver {
                return Some(suffix.with_root(PathNode::from_ident(recv, symbol)));
            }
        }

        if self.config.follow_arguments {
            let params = decl.param_idents();
            for (arg, param) in call.args.iter().zip(&params) {
                let Some(param) = param else { continue };
                let Some(arg_path) = AccessPath::build(strip_address(arg), oracle) else {
                    continue;
                };
                let rest = lock.strip_prefix(arg_path.nodes());
                if let Some((rest, symbol)) = rest.zip(oracle.object_of(param)) {
                    return Some(rest.with_root(PathNode::from_ident(param, symbol)));
                }
            }
        }

        if self.config.follow_package_locks {
            let rooted_in_package = oracle
                .symbol(lock.root().symbol)
                .is_some_and(|s| s.is_package_var());
            if rooted_in_package {
                return Some(lock.clone());
            }
        }
        None
    }

    fn location(&self, call: &CallExpr) -> SourceLocation {
        SourceLocation::new(self.inspector.program().path_of(call.id), &call.span)
    }
}

/// `&x` passes the same lock as `x`
fn strip_address(expr: &Expr) -> &Expr {
    match expr.unparen() {
        Expr::Unary(unary) if unary.op == "&" => unary.operand.unparen(),
        other => other,
    }
}
