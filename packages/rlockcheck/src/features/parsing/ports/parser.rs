//! Parser Port
//!
//! Contract for turning one source file into an owned syntax tree.

use crate::errors::Result;
use crate::features::syntax::domain::{FileId, SourceFile};

/// Port trait for source parsers
///
/// Implementations must be usable from worker threads: files are parsed in
/// parallel and each call builds whatever parser state it needs.
pub trait Parser: Send + Sync {
    /// Parse and lower one file; `file` becomes the `FileId` of every node
    fn parse(&self, source: &str, file_path: &str, file: FileId) -> Result<SourceFile>;

    /// Check if this parser handles the file extension (without the dot)
    fn supports_extension(&self, ext: &str) -> bool;

    /// Get the language name
    fn language_name(&self) -> &'static str;
}
