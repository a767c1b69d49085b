//! Build program use case
//!
//! Collects Go sources, parses them (in parallel with the `parallel`
//! feature), then resolves names across the whole program.

use std::path::Path;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info};

use crate::errors::Result;
use crate::features::parsing::infrastructure::{resolve_program, GoParser};
use crate::features::parsing::ports::Parser;
use crate::features::syntax::domain::{FileId, Program, SourceFile, TypeInfo};

/// A parsed and resolved program
#[derive(Debug, Clone)]
pub struct ParsedProgram {
    pub program: Program,
    pub types: TypeInfo,
}

/// Go front end: sources in, syntax tree plus type information out
pub struct GoFrontend<P: Parser = GoParser> {
    parser: P,
    sources: Vec<(String, String)>,
}

impl GoFrontend<GoParser> {
    pub fn new() -> Self {
        Self::with_parser(GoParser::new())
    }
}

impl Default for GoFrontend<GoParser> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Parser> GoFrontend<P> {
    pub fn with_parser(parser: P) -> Self {
        Self {
            parser,
            sources: Vec::new(),
        }
    }

    /// Add an in-memory source file
    pub fn add_source(&mut self, path: impl Into<String>, source: impl Into<String>) -> &mut Self {
        self.sources.push((path.into(), source.into()));
        self
    }

    /// Read and add a source file from disk
    pub fn add_file(&mut self, path: impl AsRef<Path>) -> Result<&mut Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        Ok(self.add_source(path.to_string_lossy().into_owned(), source))
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Parse every source and resolve the program
    pub fn build(&self) -> Result<ParsedProgram> {
        let files = self.parse_all()?;
        let program = Program::new(files);
        let types = resolve_program(&program);
        info!(
            files = program.files.len(),
            functions = program.functions().count(),
            "front end finished"
        );
        Ok(ParsedProgram { program, types })
    }

    #[cfg(feature = "parallel")]
    fn parse_all(&self) -> Result<Vec<SourceFile>> {
        debug!(files = self.sources.len(), "parsing in parallel");
        self.sources
            .par_iter()
            .enumerate()
            .map(|(i, (path, source))| self.parser.parse(source, path, FileId(i as u32)))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn parse_all(&self) -> Result<Vec<SourceFile>> {
        debug!(files = self.sources.len(), "parsing sequentially");
        self.sources
            .iter()
            .enumerate()
            .map(|(i, (path, source))| self.parser.parse(source, path, FileId(i as u32)))
            .collect()
    }
}
