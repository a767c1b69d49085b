//! Syntax domain models

pub mod ast;
pub mod type_info;

pub use ast::*;
pub use type_info::*;
