use crate::features::lock_analysis::domain::Violation;
use crate::features::syntax::domain::FuncDecl;

/// Port trait for lock reentrancy analyzers over one program
pub trait LockAnalyzer<'p> {
    /// Violations in one declaration and the closures it contains
    fn analyze_function(&self, decl: &'p FuncDecl) -> Vec<Violation>;

    /// Violations across every declaration, ordered by location
    fn analyze_program(&self) -> Vec<Violation>;
}
