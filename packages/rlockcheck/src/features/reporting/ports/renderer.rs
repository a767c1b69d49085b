use crate::errors::Result;
use crate::features::lock_analysis::domain::Violation;

/// Port trait for diagnostic renderers
pub trait ReportRenderer: Send + Sync {
    fn render(&self, violations: &[Violation]) -> Result<String>;
}
