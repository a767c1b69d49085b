//! Feature modules (vertical slices)

pub mod lock_analysis;
pub mod parsing;
pub mod reporting;
pub mod syntax;
