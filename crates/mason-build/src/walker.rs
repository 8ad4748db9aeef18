//! Depth-first project traversal
//!
//! The rest of the pipeline never touches the filesystem walker directly; it
//! supplies one closure for directories and another for files. Traversal is
//! synchronous and any walk error is fatal.

use crate::error::BuildResult;
use std::path::Path;
use walkdir::WalkDir;

/// Visit every directory strictly below `root`, depth-first.
pub fn visit_dirs(
    root: &Path,
    mut visit: impl FnMut(&Path) -> BuildResult<()>,
) -> BuildResult<()> {
    for entry in WalkDir::new(root).min_depth(1).follow_links(false) {
        let entry = entry?;
        if entry.file_type().is_dir() {
            visit(entry.path())?;
        }
    }
    Ok(())
}

/// Visit every file below `root`, depth-first, recursing into
/// subdirectories automatically.
pub fn visit_files(
    root: &Path,
    mut visit: impl FnMut(&Path) -> BuildResult<()>,
) -> BuildResult<()> {
    for entry in WalkDir::new(root).min_depth(1).follow_links(false) {
        let entry = entry?;
        if entry.file_type().is_file() {
            visit(entry.path())?;
        }
    }
    Ok(())
}

/// Whether the path names a C header
pub fn is_header(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("h")
}

/// Whether the path names a C source file
pub fn is_source(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("c")
}

/// File base-name as an owned string (empty for pathological paths)
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
