//! Tree-sitter Go parser
//!
//! This is where the tree-sitter dependency lives.

use std::path::Path;

use tracing::warn;
use tree_sitter::Parser as TSParser;

use super::go_lowering::GoLowering;
use crate::errors::{CheckError, Result};
use crate::features::parsing::ports::Parser;
use crate::features::syntax::domain::{FileId, SourceFile};

/// Go parser backed by tree-sitter-go
#[derive(Debug, Default, Clone, Copy)]
pub struct GoParser;

impl GoParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for GoParser {
    fn parse(&self, source: &str, file_path: &str, file: FileId) -> Result<SourceFile> {
        let mut parser = TSParser::new();
        parser
            .set_language(&tree_sitter_go::language())
            .map_err(|e| CheckError::parse_error(file_path, e.to_string()))?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| CheckError::parse_error(file_path, "tree-sitter produced no tree"))?;

        let root = tree.root_node();
        if root.has_error() {
            warn!(path = file_path, "syntax errors; lowering best-effort");
        }

        let dir = Path::new(file_path)
            .parent()
            .map(|p| p.to_string_lossy().into_owned())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| ".".to_string());

        Ok(GoLowering::new(source, file).lower_file(&root, file_path, &dir))
    }

    fn supports_extension(&self, ext: &str) -> bool {
        ext == "go"
    }

    fn language_name(&self) -> &'static str {
        "go"
    }
}
