//! Shared utilities

pub mod scope_stack;
pub mod tree_sitter;
