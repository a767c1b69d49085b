pub mod check_locks;

pub use check_locks::{check_program, CheckLocksUseCase};
