use std::fmt::Write;

use crate::errors::Result;
use crate::features::lock_analysis::domain::Violation;
use crate::features::reporting::ports::ReportRenderer;

/// Compiler-style diagnostics, one block per violation
#[derive(Debug, Default, Clone, Copy)]
pub struct TextRenderer;

impl TextRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Header line plus one indented line per call-stack frame
    pub fn format_violation(violation: &Violation) -> String {
        let mut out = format!(
            "{}: found recursive read lock call on {} in {}\n",
            violation.location, violation.lock_description, violation.function
        );
        for frame in &violation.call_stack {
            // Writing to a String cannot fail
            let _ = writeln!(out, "\t{:?} at {}", frame.callee_name, frame.location);
        }
        out
    }
}

impl ReportRenderer for TextRenderer {
    fn render(&self, violations: &[Violation]) -> Result<String> {
        Ok(violations.iter().map(Self::format_violation).collect())
    }
}
