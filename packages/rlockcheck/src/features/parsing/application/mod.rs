pub mod discover;
pub mod parse_package;

pub use discover::discover_go_files;
pub use parse_package::{GoFrontend, ParsedProgram};
