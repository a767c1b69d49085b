//! Go source discovery

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::errors::{CheckError, Result};

/// Directories never descended into
const SKIPPED_DIRS: &[&str] = &["vendor", "testdata", ".git"];

/// Collect `.go` files under `roots`, sorted. A root may itself be a file.
///
/// `_test.go` files are skipped unless `include_tests` is set.
pub fn discover_go_files(roots: &[PathBuf], include_tests: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for root in roots {
        if root.is_file() {
            files.push(root.clone());
            continue;
        }
        if !root.exists() {
            return Err(CheckError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} does not exist", root.display()),
            )));
        }
        let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !is_skipped_dir(entry.file_name().to_string_lossy().as_ref())
        });
        for entry in walker {
            let entry = entry.map_err(|e| CheckError::Io(e.into()))?;
            if entry.file_type().is_file() && is_go_source(entry.path(), include_tests) {
                files.push(entry.into_path());
            }
        }
    }
    files.sort();
    files.dedup();
    debug!(count = files.len(), "go sources discovered");
    Ok(files)
}

fn is_skipped_dir(name: &str) -> bool {
    SKIPPED_DIRS.contains(&name) || (name.starts_with('.') && name.len() > 1)
}

fn is_go_source(path: &Path, include_tests: bool) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.ends_with(".go") && (include_tests || !name.ends_with("_test.go"))
}
