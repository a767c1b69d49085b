//! Per-activation lock state
//!
//! Extents are stored as the span of the construct that opened them; a node
//! is inside an extent while it starts before the extent's end byte.

use crate::features::lock_analysis::domain::AccessPath;
use crate::shared::models::Span;

#[derive(Debug, Clone, Default)]
pub struct LockState {
    /// Net acquisitions of `lock` on the path walked so far
    pub held_count: u32,
    /// First lock acquired in this activation
    pub lock: Option<AccessPath>,
    /// A `defer` releasing the lock is pending
    pub deferred_release: bool,
    pub function_extent: Option<Span>,
    pub defer_extent: Option<Span>,
    pub return_extent: Option<Span>,
    pub closure_extent: Option<Span>,
    /// Amount subtracted at the pending return, restored once past it
    pub released_at_return: u32,
}

impl LockState {
    /// Fresh state for a function or closure starting at `extent`
    pub fn enter(extent: Span) -> Self {
        Self {
            function_extent: Some(extent),
            ..Self::default()
        }
    }

    /// The lock currently held, if any
    pub fn held_lock(&self) -> Option<&AccessPath> {
        if self.held_count > 0 {
            self.lock.as_ref()
        } else {
            None
        }
    }

    pub fn acquire(&mut self) {
        self.held_count += 1;
    }

    /// Decrement without going below zero; returns the amount subtracted
    pub fn release(&mut self) -> u32 {
        if self.held_count > 0 {
            self.held_count -= 1;
            1
        } else {
            0
        }
    }
}

/// Whether `span` starts inside `extent`
pub(crate) fn within(extent: &Span, span: &Span) -> bool {
    span.start_byte < extent.end_byte
}
