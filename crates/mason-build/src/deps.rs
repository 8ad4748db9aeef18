//! Change propagation
//!
//! Seeds a set of changed header base-names from the snapshot cache, then
//! grows it to the full transitive closure of "textually includes a changed
//! header". The closure is computed by repeated full scans of every header
//! in the project until a pass adds no new members, so the result is
//! independent of scan order. Matching is substring-based on `#include`
//! lines; no include paths are resolved.

use crate::cache::SnapshotCache;
use crate::error::{BuildError, BuildResult};
use crate::walker;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Set of header base-names known to have changed this run.
///
/// Grows monotonically during propagation; never persisted across runs.
#[derive(Debug, Clone, Default)]
pub struct ChangedSet {
    names: HashSet<String>,
}

impl ChangedSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header base-name
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    /// Whether this base-name is already a member
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Whether an `#include` line references any member as a substring
    pub fn line_hits(&self, line: &str) -> bool {
        self.names.iter().any(|name| line.contains(name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Seed the changed set: every header whose bytes differ from its mirror
/// joins the set, and its mirror is committed immediately so later
/// comparisons within this run see the new content as the baseline.
pub fn seed_changed_headers(
    cache: &SnapshotCache,
    project_root: &Path,
) -> BuildResult<ChangedSet> {
    let mut changed = ChangedSet::new();
    walker::visit_files(project_root, |file| {
        if !walker::is_header(file) {
            return Ok(());
        }
        if cache.is_changed(file)? {
            changed.insert(walker::base_name(file));
            cache.commit(file)?;
        }
        Ok(())
    })?;
    Ok(changed)
}

/// Grow `changed` to its fixed point: repeatedly scan every header in the
/// project, adding any header whose `#include` lines reference a member,
/// until a complete pass adds nothing. Termination is guaranteed because
/// the set is bounded by the header count and strictly grows.
pub fn propagate(project_root: &Path, changed: &mut ChangedSet) -> BuildResult<()> {
    if changed.is_empty() {
        return Ok(());
    }
    loop {
        let before = changed.len();
        scan_pass(project_root, changed)?;
        if changed.len() == before {
            break;
        }
    }
    Ok(())
}

/// One full pass over every project header
fn scan_pass(project_root: &Path, changed: &mut ChangedSet) -> BuildResult<()> {
    walker::visit_files(project_root, |file| {
        if !walker::is_header(file) {
            return Ok(());
        }
        let name = walker::base_name(file);
        if changed.contains(&name) {
            return Ok(());
        }
        if includes_changed_header(file, changed)? {
            changed.insert(name);
        }
        Ok(())
    })
}

/// Whether any `#include` line of `file` references a changed header
pub(crate) fn includes_changed_header(file: &Path, changed: &ChangedSet) -> BuildResult<bool> {
    let text = fs::read_to_string(file).map_err(|e| BuildError::io(file, e))?;
    Ok(text
        .lines()
        .any(|line| line.contains("#include") && changed.line_hits(line)))
}
