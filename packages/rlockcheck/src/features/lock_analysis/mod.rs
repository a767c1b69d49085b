/// Lock Analysis Feature
///
/// Detects a read lock acquired a second time before it is released, either
/// in the same function or through a chain of calls.
///
/// ## Architecture
/// - **Domain**: access paths, callee identity, per-activation lock state, violations
/// - **Infrastructure**: call resolver, declaration locator, lock-state tracker,
///   nested-lock search, `ReentrancyAnalyzer`
/// - **Application**: `CheckLocksUseCase`, `check_program`
/// - **Ports**: `LockAnalyzer` trait
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::{check_program, CheckLocksUseCase};
pub use domain::{
    AccessPath, CalleeIdentity, CalleeKind, LockState, PathNode, StackFrame, Violation,
    ViolationKind,
};
pub use infrastructure::ReentrancyAnalyzer;
pub use ports::LockAnalyzer;
