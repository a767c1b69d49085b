//! Lock analysis infrastructure

pub mod call_resolver;
pub mod decl_locator;
pub mod lock_tracker;
pub mod nested_search;
pub mod reentrancy_analyzer;

pub use call_resolver::CallResolver;
pub use decl_locator::{declared_identity, DeclIndex, DeclLocator};
pub use lock_tracker::{ActivationReport, LockTracker, PendingClosure};
pub use nested_search::NestedSearch;
pub use reentrancy_analyzer::ReentrancyAnalyzer;
