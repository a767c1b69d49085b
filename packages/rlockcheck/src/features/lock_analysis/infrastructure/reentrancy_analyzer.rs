//! Interprocedural read-lock reentrancy analyzer
//!
//! Wires the call resolver, declaration locator, nested search and tracker
//! together over one program. Every function declaration is one activation;
//! closures it contains are analyzed as further activations with fresh state.

use std::collections::VecDeque;

use tracing::{debug, info};

use crate::config::AnalyzerConfig;
use crate::features::lock_analysis::domain::Violation;
use crate::features::lock_analysis::infrastructure::call_resolver::CallResolver;
use crate::features::lock_analysis::infrastructure::decl_locator::{
    declared_identity, DeclIndex, DeclLocator,
};
use crate::features::lock_analysis::infrastructure::lock_tracker::{LockTracker, PendingClosure};
use crate::features::lock_analysis::infrastructure::nested_search::NestedSearch;
use crate::features::lock_analysis::ports::LockAnalyzer;
use crate::features::syntax::domain::{FuncDecl, Program};
use crate::features::syntax::infrastructure::Inspector;
use crate::features::syntax::ports::TypeOracle;

pub struct ReentrancyAnalyzer<'p> {
    inspector: Inspector<'p>,
    index: DeclIndex<'p>,
    oracle: &'p dyn TypeOracle,
    config: AnalyzerConfig,
}

impl<'p> ReentrancyAnalyzer<'p> {
    pub fn new(program: &'p Program, oracle: &'p dyn TypeOracle, config: AnalyzerConfig) -> Self {
        let inspector = Inspector::new(program);
        let index = DeclIndex::build(&inspector, oracle);
        debug!(
            functions = inspector.functions().len(),
            indexed = index.len(),
            "declaration index built"
        );
        Self {
            inspector,
            index,
            oracle,
            config,
        }
    }

    /// `Recv.Name` for methods, `Name` for functions
    fn function_label(&self, decl: &FuncDecl) -> String {
        declared_identity(decl, self.oracle)
            .map(|identity| identity.display)
            .unwrap_or_else(|| decl.name.name.clone())
    }
}

impl<'p> LockAnalyzer<'p> for ReentrancyAnalyzer<'p> {
    fn analyze_function(&self, decl: &'p FuncDecl) -> Vec<Violation> {
        let resolver = CallResolver::new(self.oracle, &self.config.lock);
        let locator = DeclLocator::new(&self.index, &self.inspector, self.oracle);
        let search = NestedSearch::new(&self.inspector, &resolver, &locator, self.config.search);
        let tracker = LockTracker::new(&self.inspector, &resolver, &locator, &search);

        let label = self.function_label(decl);
        let report = tracker.run(&label, &self.inspector.preorder(decl));
        let mut violations = report.violations;

        let mut pending: VecDeque<PendingClosure<'p>> = report.closures.into();
        while let Some(closure) = pending.pop_front() {
            let nodes = self.inspector.preorder_closure(closure.literal);
            let report = tracker.run(&closure.name, &nodes);
            violations.extend(report.violations);
            pending.extend(report.closures);
        }
        violations
    }

    fn analyze_program(&self) -> Vec<Violation> {
        let mut violations: Vec<Violation> = self
            .inspector
            .functions()
            .iter()
            .flat_map(|&decl| self.analyze_function(decl))
            .collect();
        violations.sort_by(|a, b| {
            (&a.location.file, a.location.line, a.location.column)
                .cmp(&(&b.location.file, b.location.line, b.location.column))
        });
        info!(
            functions = self.inspector.functions().len(),
            violations = violations.len(),
            "lock analysis complete"
        );
        violations
    }
}
