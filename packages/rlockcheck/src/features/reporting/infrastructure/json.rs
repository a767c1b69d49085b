use crate::errors::Result;
use crate::features::lock_analysis::domain::Violation;
use crate::features::reporting::ports::ReportRenderer;

/// Pretty-printed JSON array of violations
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonRenderer;

impl JsonRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl ReportRenderer for JsonRenderer {
    fn render(&self, violations: &[Violation]) -> Result<String> {
        let mut out = serde_json::to_string_pretty(violations)?;
        out.push('\n');
        Ok(out)
    }
}
