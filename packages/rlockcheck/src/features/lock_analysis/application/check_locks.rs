//! Check locks use case

use crate::config::AnalyzerConfig;
use crate::features::lock_analysis::domain::Violation;
use crate::features::lock_analysis::infrastructure::ReentrancyAnalyzer;
use crate::features::lock_analysis::ports::LockAnalyzer;
use crate::features::parsing::ParsedProgram;
use crate::features::syntax::domain::FuncDecl;

pub struct CheckLocksUseCase<A> {
    analyzer: A,
}

impl<'p, A: LockAnalyzer<'p>> CheckLocksUseCase<A> {
    pub fn new(analyzer: A) -> Self {
        Self { analyzer }
    }

    pub fn execute(&self) -> Vec<Violation> {
        self.analyzer.analyze_program()
    }

    pub fn execute_function(&self, decl: &'p FuncDecl) -> Vec<Violation> {
        self.analyzer.analyze_function(decl)
    }
}

/// Analyze a parsed program with the default analyzer
pub fn check_program(parsed: &ParsedProgram, config: &AnalyzerConfig) -> Vec<Violation> {
    let analyzer = ReentrancyAnalyzer::new(&parsed.program, &parsed.types, config.clone());
    CheckLocksUseCase::new(analyzer).execute()
}
