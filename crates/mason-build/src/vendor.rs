//! Vendor consolidation
//!
//! External `SOURCE` entries are third-party translation units the project
//! compiles once. All of them are folded into a single auto-generated file
//! under `build/vendor/` that `#include`s each entry, compiled to one
//! `vendor.o`. The vendor object is rebuilt only when it is missing;
//! deleting `build/vendor/vendor.o` forces a rebuild.

use crate::cache::VENDOR_DIR;
use crate::compiler::{CompileJob, Toolchain};
use crate::error::{BuildError, BuildResult};
use crate::walker;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the generated consolidation unit
pub const MERGED_UNIT: &str = "mason_merged_vendors.c";
/// Name of the compiled vendor object
pub const VENDOR_OBJECT: &str = "vendor.o";

/// Expand `SOURCE` entries into concrete source paths, relative to `root`.
/// A directory entry is walked for `.c` files; a file entry is kept as-is.
pub fn collect_vendor_sources(root: &Path, entries: &[PathBuf]) -> BuildResult<Vec<PathBuf>> {
    let mut sources = Vec::new();
    for entry in entries {
        let full = root.join(entry);
        if full.is_dir() {
            walker::visit_files(&full, |file| {
                if walker::is_source(file) {
                    let rel = file.strip_prefix(root).unwrap_or(file);
                    sources.push(rel.to_path_buf());
                }
                Ok(())
            })?;
        } else {
            sources.push(entry.clone());
        }
    }
    Ok(sources)
}

/// Compile the consolidated vendor unit if its object is missing, and
/// append the vendor object to the object set. Does nothing when there
/// are no vendor sources. Returns whether a compile was performed.
pub fn compile_vendors(
    root: &Path,
    sources: &[PathBuf],
    toolchain: &dyn Toolchain,
    objects: &mut Vec<PathBuf>,
    verbose: bool,
) -> BuildResult<bool> {
    if sources.is_empty() {
        return Ok(false);
    }

    let vendor_object = root.join(VENDOR_DIR).join(VENDOR_OBJECT);
    let mut compiled = false;
    if !vendor_object.is_file() {
        if verbose {
            println!("  Compiling vendors ({} units)", sources.len());
        }
        let merged = root.join(VENDOR_DIR).join(MERGED_UNIT);
        let mut text = String::new();
        for source in sources {
            // The merged unit sits two levels below the workspace root.
            text.push_str(&format!("#include \"../../{}\"\n", source.display()));
        }
        fs::write(&merged, text).map_err(|e| BuildError::io(&merged, e))?;

        toolchain.compile(&CompileJob {
            source: &merged,
            object: &vendor_object,
        })?;
        compiled = true;
    }

    objects.push(vendor_object);
    Ok(compiled)
}
