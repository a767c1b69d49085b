//! Access paths: how a lock object is reached syntactically
//!
//! `s.cache.mu.RLock()` becomes `[s, cache, mu, RLock]`, root first. Every
//! node carries the symbol its identifier resolves to, and equality is
//! decided on symbols alone: two differently named variables never match,
//! and two variables named alike in different scopes never match either.

use serde::Serialize;

use crate::features::syntax::domain::{Expr, Ident, SymbolId};
use crate::features::syntax::ports::TypeOracle;
use crate::shared::models::Span;

/// One selector step of an access path
#[derive(Debug, Clone, Serialize)]
pub struct PathNode {
    pub name: String,
    pub symbol: SymbolId,
    pub span: Span,
}

impl PathNode {
    pub fn new(name: impl Into<String>, symbol: SymbolId, span: Span) -> Self {
        Self {
            name: name.into(),
            symbol,
            span,
        }
    }

    /// Node for a resolved identifier
    pub fn from_ident(ident: &Ident, symbol: SymbolId) -> Self {
        Self::new(ident.name.clone(), symbol, ident.span)
    }

    fn same_as(&self, other: &PathNode) -> bool {
        self.symbol == other.symbol
    }
}

/// Ordered, non-empty chain of resolved selector steps (root first)
#[derive(Debug, Clone, Serialize)]
pub struct AccessPath {
    nodes: Vec<PathNode>,
}

impl AccessPath {
    /// `None` for an empty chain
    pub fn new(nodes: Vec<PathNode>) -> Option<Self> {
        if nodes.is_empty() {
            None
        } else {
            Some(Self { nodes })
        }
    }

    /// Decompose a selector chain right-to-left down to its root identifier.
    ///
    /// Returns `None` for any other shape (index, call, dereference in the
    /// middle of the chain) and for any step the oracle cannot resolve.
    pub fn build(expr: &Expr, oracle: &dyn TypeOracle) -> Option<Self> {
        let mut nodes = Vec::new();
        let mut current = expr.unparen();
        loop {
            match current {
                Expr::Ident(ident) => {
                    let symbol = oracle.object_of(ident)?;
                    nodes.push(PathNode::from_ident(ident, symbol));
                    break;
                }
                Expr::Selector(sel) => {
                    let symbol = oracle
                        .selection(sel)
                        .or_else(|| oracle.object_of(&sel.sel))?;
                    nodes.push(PathNode::from_ident(&sel.sel, symbol));
                    current = sel.base.unparen();
                }
                _ => return None,
            }
        }
        nodes.reverse();
        Some(Self { nodes })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[PathNode] {
        &self.nodes
    }

    pub fn root(&self) -> &PathNode {
        &self.nodes[0]
    }

    pub fn last(&self) -> &PathNode {
        &self.nodes[self.nodes.len() - 1]
    }

    /// Same length, and the first `len - offset` nodes resolve to the same
    /// symbols. `offset = 1` compares "the lock" while ignoring the operation
    /// invoked on it.
    pub fn equal(&self, other: &AccessPath, offset: usize) -> bool {
        if self.len() != other.len() {
            return false;
        }
        let compared = self.len().saturating_sub(offset);
        self.nodes[..compared]
            .iter()
            .zip(&other.nodes[..compared])
            .all(|(a, b)| a.same_as(b))
    }

    /// True when `prefix` matches the leading nodes of this path
    pub fn starts_with(&self, prefix: &[PathNode]) -> bool {
        prefix.len() <= self.len()
            && self
                .nodes
                .iter()
                .zip(prefix)
                .all(|(a, b)| a.same_as(b))
    }

    /// Remainder of this path after `prefix`, starting at the node matching
    /// the last prefix node so the caller can substitute a new root for it.
    ///
    /// `prefix` must be non-empty and strictly shorter than this path.
    pub fn strip_prefix(&self, prefix: &[PathNode]) -> Option<AccessPath> {
        if prefix.is_empty() || prefix.len() >= self.len() || !self.starts_with(prefix) {
            return None;
        }
        Some(Self {
            nodes: self.nodes[prefix.len() - 1..].to_vec(),
        })
    }

    /// Suffix relative to a method call path: `other` is `recv...method`,
    /// the receiver part (everything but the method) must prefix this path.
    ///
    /// Lock `[s, mu, RLock]` against call `[s, helper]` yields `[s, mu, RLock]`
    /// rooted at the receiver node, ready for [`AccessPath::with_root`].
    pub fn suffix(&self, other: &AccessPath) -> Option<AccessPath> {
        if other.len() < 2 || other.len() > self.len() {
            return None;
        }
        self.strip_prefix(&other.nodes[..other.len() - 1])
    }

    /// Copy of this path with only the root node replaced
    pub fn with_root(&self, root: PathNode) -> AccessPath {
        let mut nodes = self.nodes.clone();
        nodes[0] = root;
        Self { nodes }
    }

    /// Dotted spelling of the whole path
    pub fn describe(&self) -> String {
        self.nodes
            .iter()
            .map(|n| n.name.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Dotted spelling of the lock object, without the trailing operation
    pub fn describe_target(&self) -> String {
        if self.len() == 1 {
            return self.describe();
        }
        self.nodes[..self.len() - 1]
            .iter()
            .map(|n| n.name.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }
}
