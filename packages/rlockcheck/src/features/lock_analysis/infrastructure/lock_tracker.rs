//! Lock-state tracker
//!
//! Folds one activation's pre-order node stream into violations. The stream
//! of a function declaration also contains its closures, defers, and return
//! statements; extents recorded on [`LockState`] decide which of those nodes
//! the activation itself interprets.

use tracing::{debug, trace};

use crate::features::lock_analysis::domain::lock_state::within;
use crate::features::lock_analysis::domain::{AccessPath, LockState, Violation};
use crate::features::lock_analysis::infrastructure::call_resolver::CallResolver;
use crate::features::lock_analysis::infrastructure::decl_locator::DeclLocator;
use crate::features::lock_analysis::infrastructure::nested_search::NestedSearch;
use crate::features::syntax::domain::{CallExpr, DeferStmt, FuncLit, ReturnStmt};
use crate::features::syntax::infrastructure::{Inspector, TraversalNode};
use crate::shared::models::SourceLocation;

/// Closure literal found inside an activation, to be analyzed on its own
#[derive(Debug, Clone)]
pub struct PendingClosure<'p> {
    pub name: String,
    pub literal: &'p FuncLit,
}

/// Result of tracking one activation
#[derive(Debug, Default)]
pub struct ActivationReport<'p> {
    pub violations: Vec<Violation>,
    pub closures: Vec<PendingClosure<'p>>,
}

pub struct LockTracker<'a, 'p> {
    inspector: &'a Inspector<'p>,
    resolver: &'a CallResolver<'a>,
    locator: &'a DeclLocator<'a, 'p>,
    search: &'a NestedSearch<'a, 'p>,
}

impl<'a, 'p> LockTracker<'a, 'p> {
    pub fn new(
        inspector: &'a Inspector<'p>,
        resolver: &'a CallResolver<'a>,
        locator: &'a DeclLocator<'a, 'p>,
        search: &'a NestedSearch<'a, 'p>,
    ) -> Self {
        Self {
            inspector,
            resolver,
            locator,
            search,
        }
    }

    /// Track an activation named `function`; the first node opens it
    pub fn run(&self, function: &str, nodes: &[TraversalNode<'p>]) -> ActivationReport<'p> {
        let mut report = ActivationReport::default();
        let Some((first, rest)) = nodes.split_first() else {
            return report;
        };
        // Go names closures `F.func1`, and closures nested in those `F.func1.1`
        let closure_prefix = match first {
            TraversalNode::FuncLit(_) => format!("{}.", function),
            _ => format!("{}.func", function),
        };
        let mut state = LockState::enter(first.span());
        for node in rest {
            self.visit(function, &closure_prefix, &mut state, *node, &mut report);
        }
        debug!(
            function,
            violations = report.violations.len(),
            closures = report.closures.len(),
            "activation tracked"
        );
        report
    }

    fn visit(
        &self,
        function: &str,
        closure_prefix: &str,
        state: &mut LockState,
        node: TraversalNode<'p>,
        report: &mut ActivationReport<'p>,
    ) {
        let span = node.span();

        if let Some(extent) = state.closure_extent {
            if within(&extent, &span) {
                return;
            }
            state.closure_extent = None;
        }
        if let Some(extent) = state.defer_extent {
            if within(&extent, &span) {
                if let TraversalNode::FuncLit(lit) = node {
                    self.queue_closure(closure_prefix, state, lit, report);
                }
                return;
            }
            state.defer_extent = None;
        }
        if let Some(extent) = state.return_extent {
            if !within(&extent, &span) {
                state.return_extent = None;
                state.held_count += state.released_at_return;
                state.released_at_return = 0;
                trace!(held = state.held_count, "past return, count restored");
            }
        }

        match node {
            TraversalNode::Call(call) => self.visit_call(function, state, call, report),
            TraversalNode::FuncLit(lit) => self.queue_closure(closure_prefix, state, lit, report),
            TraversalNode::Defer(defer) => self.visit_defer(state, defer),
            TraversalNode::Return(ret) => visit_return(state, ret),
            // Declarations only ever open a stream
            TraversalNode::FuncDecl(_) => {}
        }
    }

    fn visit_call(
        &self,
        function: &str,
        state: &mut LockState,
        call: &'p CallExpr,
        report: &mut ActivationReport<'p>,
    ) {
        let identity = self.resolver.resolve(call);
        let path = AccessPath::build(&call.fun, self.resolver.oracle());
        let is_acquire = identity
            .as_ref()
            .is_some_and(|id| self.resolver.is_acquire(id));
        let is_release = identity
            .as_ref()
            .is_some_and(|id| self.resolver.is_release(id));

        let mut reacquired = false;
        if let Some(lock) = state.held_lock().cloned() {
            if path.as_ref().is_some_and(|p| p.equal(&lock, 0)) {
                reacquired = true;
                debug!(function, line = call.span.start_line, "direct re-acquisition");
                report.violations.push(Violation::direct(
                    function,
                    self.location(call),
                    lock.describe_target(),
                ));
            } else if !is_release {
                if let Some(stack) = self.search.search(&lock, call) {
                    report.violations.push(Violation::nested(
                        function,
                        self.location(call),
                        lock.describe_target(),
                        stack,
                    ));
                }
            }
        }

        if is_acquire {
            if let Some(path) = &path {
                if state.held_count == 0 {
                    state.lock = Some(path.clone());
                    state.acquire();
                } else if reacquired {
                    state.acquire();
                }
                trace!(held = state.held_count, lock = %path.describe(), "acquire");
            }
        }
        if is_release && self.releases_held(state, path.as_ref()) {
            state.release();
            trace!(held = state.held_count, "release");
        }
    }

    fn visit_defer(&self, state: &mut LockState, defer: &'p DeferStmt) {
        state.defer_extent = Some(defer.span);

        if self.is_held_release(state, &defer.call) || self.closure_releases(state, &defer.call) {
            state.deferred_release = true;
            trace!(line = defer.span.start_line, "release deferred");
        }
    }

    /// A deferred closure that releases the held lock in its own body
    fn closure_releases(&self, state: &LockState, call: &'p CallExpr) -> bool {
        let Some(lit) = self.locator.closure_literal(call) else {
            return false;
        };
        self.inspector
            .calls_in(&lit.body)
            .into_iter()
            .any(|inner| self.is_held_release(state, inner))
    }

    /// Release operation invoked on the held lock
    fn is_held_release(&self, state: &LockState, call: &CallExpr) -> bool {
        let is_release = self
            .resolver
            .resolve(call)
            .is_some_and(|id| self.resolver.is_release(&id));
        is_release
            && self.releases_held(
                state,
                AccessPath::build(&call.fun, self.resolver.oracle()).as_ref(),
            )
    }

    fn releases_held(&self, state: &LockState, path: Option<&AccessPath>) -> bool {
        match (&state.lock, path) {
            (Some(lock), Some(path)) => lock.equal(path, 1),
            _ => false,
        }
    }

    fn queue_closure(
        &self,
        closure_prefix: &str,
        state: &mut LockState,
        lit: &'p FuncLit,
        report: &mut ActivationReport<'p>,
    ) {
        if state.closure_extent.is_none() {
            state.closure_extent = Some(lit.span);
        }
        let index = report.closures.len() + 1;
        report.closures.push(PendingClosure {
            name: format!("{}{}", closure_prefix, index),
            literal: lit,
        });
    }

    fn location(&self, call: &CallExpr) -> SourceLocation {
        SourceLocation::new(self.inspector.program().path_of(call.id), &call.span)
    }
}

fn visit_return(state: &mut LockState, ret: &ReturnStmt) {
    if state.deferred_release && state.return_extent.is_none() {
        state.released_at_return = state.release();
        state.return_extent = Some(ret.span);
        trace!(held = state.held_count, "deferred release fired at return");
    }
}
