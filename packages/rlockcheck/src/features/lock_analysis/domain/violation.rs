//! Detected nested read-lock acquisitions

use serde::{Deserialize, Serialize};

use crate::shared::models::SourceLocation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationKind {
    /// Second acquisition in the same function body
    Direct,
    /// Second acquisition reached through calls
    Nested,
}

/// One call on the path to the second acquisition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackFrame {
    pub callee_name: String,
    pub location: SourceLocation,
}

impl StackFrame {
    pub fn new(callee_name: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            callee_name: callee_name.into(),
            location,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub kind: ViolationKind,
    /// Function (or closure) in which the lock is held
    pub function: String,
    /// Call site that re-acquires, directly or through calls
    pub location: SourceLocation,
    /// Lock object, e.g. `s.mu`
    pub lock_description: String,
    /// Outermost call first; empty for direct violations
    pub call_stack: Vec<StackFrame>,
}

impl Violation {
    pub fn direct(
        function: impl Into<String>,
        location: SourceLocation,
        lock_description: impl Into<String>,
    ) -> Self {
        Self {
            kind: ViolationKind::Direct,
            function: function.into(),
            location,
            lock_description: lock_description.into(),
            call_stack: Vec::new(),
        }
    }

    pub fn nested(
        function: impl Into<String>,
        location: SourceLocation,
        lock_description: impl Into<String>,
        call_stack: Vec<StackFrame>,
    ) -> Self {
        Self {
            kind: ViolationKind::Nested,
            function: function.into(),
            location,
            lock_description: lock_description.into(),
            call_stack,
        }
    }

    /// Names of the called functions, outermost first
    pub fn callee_names(&self) -> Vec<&str> {
        self.call_stack
            .iter()
            .map(|f| f.callee_name.as_str())
            .collect()
    }
}
