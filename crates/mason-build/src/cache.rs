//! Snapshot cache
//!
//! Mirrors every project file into `build/cache/<project-tree>` and answers
//! "has this file changed since the last successful build?" by comparing the
//! file against its mirrored copy byte for byte. No hashing and no metadata:
//! the mirror copies themselves encode the last known good content, so a
//! stale mirror after a failed compile makes the next run retry that unit.
//!
//! Compiled objects live next to their mirror copy as `<mirror>.o`.

use crate::error::{BuildError, BuildResult};
use crate::walker;
use std::fs;
use std::path::{Path, PathBuf};

/// Root of the on-disk mirror, relative to the workspace root
pub const CACHE_DIR: &str = "build/cache";
/// Vendor area, relative to the workspace root
pub const VENDOR_DIR: &str = "build/vendor";

/// Content-mirrored snapshot cache rooted at a workspace directory
#[derive(Debug, Clone)]
pub struct SnapshotCache {
    root: PathBuf,
}

impl SnapshotCache {
    /// Create a cache for the workspace rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the parallel cache directory structure: `build/`,
    /// `build/cache/`, `build/vendor/`, the mirrored project root, and one
    /// mirror directory per project subdirectory.
    pub fn ensure_mirror(&self, project_dir: &Path) -> BuildResult<()> {
        let cache_root = self.root.join(CACHE_DIR);
        let vendor_root = self.root.join(VENDOR_DIR);
        fs::create_dir_all(&cache_root).map_err(|e| BuildError::io(&cache_root, e))?;
        fs::create_dir_all(&vendor_root).map_err(|e| BuildError::io(&vendor_root, e))?;

        let project_mirror = cache_root.join(project_dir);
        fs::create_dir_all(&project_mirror).map_err(|e| BuildError::io(&project_mirror, e))?;

        let project_root = self.root.join(project_dir);
        walker::visit_dirs(&project_root, |dir| {
            let mirror = self.mirror_path(dir);
            fs::create_dir_all(&mirror).map_err(|e| BuildError::io(&mirror, e))
        })
    }

    /// Mirror location for a project file or directory
    pub fn mirror_path(&self, file: &Path) -> PathBuf {
        self.root.join(CACHE_DIR).join(self.relative(file))
    }

    /// True if no mirrored copy exists, sizes differ, or content differs.
    /// Full-file comparison by design; never hashed.
    pub fn is_changed(&self, file: &Path) -> BuildResult<bool> {
        let mirror = self.mirror_path(file);
        if !mirror.is_file() {
            return Ok(true);
        }

        let file_meta = fs::metadata(file).map_err(|e| BuildError::io(file, e))?;
        let mirror_meta = fs::metadata(&mirror).map_err(|e| BuildError::io(&mirror, e))?;
        if file_meta.len() != mirror_meta.len() {
            return Ok(true);
        }

        let current = fs::read(file).map_err(|e| BuildError::io(file, e))?;
        let cached = fs::read(&mirror).map_err(|e| BuildError::io(&mirror, e))?;
        Ok(current != cached)
    }

    /// Overwrite the mirrored copy with the file's current bytes
    pub fn commit(&self, file: &Path) -> BuildResult<()> {
        let mirror = self.mirror_path(file);
        if let Some(parent) = mirror.parent() {
            fs::create_dir_all(parent).map_err(|e| BuildError::io(parent, e))?;
        }
        fs::copy(file, &mirror).map_err(|e| BuildError::io(&mirror, e))?;
        Ok(())
    }

    /// Object path for a compiled source: the mirror path with `.o` appended
    pub fn object_path(&self, source: &Path) -> PathBuf {
        let mut path = self.mirror_path(source).into_os_string();
        path.push(".o");
        PathBuf::from(path)
    }

    /// Whether a cached object exists for this source
    pub fn has_object(&self, source: &Path) -> bool {
        self.object_path(source).is_file()
    }

    /// Delete the cached object for this source, forcing recompilation.
    /// Deleting an already-absent object is not an error.
    pub fn remove_object(&self, source: &Path) -> BuildResult<()> {
        let object = self.object_path(source);
        match fs::remove_file(&object) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BuildError::io(&object, e)),
        }
    }

    fn relative<'a>(&self, file: &'a Path) -> &'a Path {
        file.strip_prefix(&self.root).unwrap_or(file)
    }
}
