//! Lock analysis domain models

pub mod access_path;
pub mod callee;
pub mod lock_state;
pub mod violation;

pub use access_path::{AccessPath, PathNode};
pub use callee::{CalleeIdentity, CalleeKind};
pub use lock_state::LockState;
pub use violation::{StackFrame, Violation, ViolationKind};
