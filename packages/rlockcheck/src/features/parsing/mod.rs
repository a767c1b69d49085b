//! Parsing Feature
//!
//! The Go front end: tree-sitter parsing, lowering into `features::syntax`
//! trees, and program-wide name/type resolution.
//!
//! ## Structure
//! - `ports/` - Parser trait
//! - `application/` - GoFrontend (sources in, program + type info out), source discovery
//! - `infrastructure/` - GoParser, GoLowering, resolver, `sync` stub

pub mod application;
pub mod infrastructure;
pub mod ports;

pub use application::{discover_go_files, GoFrontend, ParsedProgram};
pub use infrastructure::{resolve_program, GoParser};
pub use ports::Parser;
