//! Parsing infrastructure: tree-sitter lowering and name resolution

pub(crate) mod builtins;
pub mod go_lowering;
pub mod go_parser;
pub mod resolver;

pub use go_lowering::GoLowering;
pub use go_parser::GoParser;
pub use resolver::resolve_program;
