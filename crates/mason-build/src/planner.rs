//! Build planning
//!
//! Walks every source file in the project and decides, per file, whether
//! the external compiler must run. The decision combines the snapshot
//! cache (byte-level source changes) with the changed-header closure
//! (headers the source textually includes): a cached object is invalidated
//! when any include line references a member of the closure, even if the
//! source bytes themselves are untouched.

use crate::cache::SnapshotCache;
use crate::compiler::{CompileJob, Toolchain};
use crate::deps::{self, ChangedSet};
use crate::error::{BuildError, BuildResult};
use crate::walker;
use std::path::{Path, PathBuf};

/// One source file's compilation record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildUnit {
    /// Source file path
    pub source: PathBuf,
    /// Object file path in the cache
    pub object: PathBuf,
    /// Whether the unit was already up to date (no compile performed)
    pub up_to_date: bool,
}

/// Result of planning and compiling all sources
#[derive(Debug)]
pub struct PlanOutcome {
    /// The distinguished main translation unit (linked, never compiled
    /// to an object)
    pub main_source: PathBuf,
    /// All non-main units visited, in traversal order
    pub units: Vec<BuildUnit>,
    /// Number of units actually recompiled
    pub compiled: usize,
}

/// Visit every `.c` file under `project_root`, compile what is stale, and
/// append each unit's object to `objects` in traversal order.
///
/// Fatal conditions: a second main-file candidate, any I/O failure, and a
/// non-zero compiler exit (no partial or best-effort builds).
pub fn compile_sources(
    cache: &SnapshotCache,
    project_root: &Path,
    main_file: &str,
    changed: &ChangedSet,
    toolchain: &dyn Toolchain,
    objects: &mut Vec<PathBuf>,
    verbose: bool,
) -> BuildResult<PlanOutcome> {
    let mut main_source: Option<PathBuf> = None;
    let mut units = Vec::new();
    let mut compiled = 0usize;

    walker::visit_files(project_root, |file| {
        if !walker::is_source(file) {
            return Ok(());
        }
        let name = walker::base_name(file);

        if name == main_file {
            if let Some(first) = &main_source {
                return Err(BuildError::DuplicateMain {
                    first: first.clone(),
                    second: file.to_path_buf(),
                });
            }
            main_source = Some(file.to_path_buf());
            return Ok(());
        }

        // A cached object built against an older header set is stale even
        // when the source bytes are identical to the mirror.
        if cache.has_object(file) && deps::includes_changed_header(file, changed)? {
            cache.remove_object(file)?;
        }

        let object = cache.object_path(file);
        let must_compile = !cache.has_object(file) || cache.is_changed(file)?;

        if must_compile {
            if verbose {
                println!("  Compiling {}", name);
            }
            toolchain.compile(&CompileJob {
                source: file,
                object: &object,
            })?;
            // Only a successful compile moves the mirror baseline forward;
            // a failure leaves it stale so the next run retries this unit.
            cache.commit(file)?;
            compiled += 1;
        }

        objects.push(object.clone());
        units.push(BuildUnit {
            source: file.to_path_buf(),
            object,
            up_to_date: !must_compile,
        });
        Ok(())
    })?;

    let main_source = main_source.ok_or_else(|| BuildError::MissingMain {
        expected: main_file.to_string(),
    })?;

    Ok(PlanOutcome {
        main_source,
        units,
        compiled,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::TempDir;

    /// Records compile requests and writes a placeholder object file
    #[derive(Default)]
    struct FakeToolchain {
        compiled: RefCell<Vec<String>>,
    }

    impl Toolchain for FakeToolchain {
        fn compile(&self, job: &CompileJob<'_>) -> BuildResult<()> {
            self.compiled.borrow_mut().push(walker::base_name(job.source));
            fs::write(job.object, b"obj").map_err(|e| BuildError::io(job.object, e))
        }

        fn link(&self, job: &crate::compiler::LinkJob<'_>) -> BuildResult<()> {
            fs::write(job.output, b"bin").map_err(|e| BuildError::io(job.output, e))
        }
    }

    fn fixture(files: &[(&str, &str)]) -> (TempDir, SnapshotCache) {
        let temp_dir = TempDir::new().unwrap();
        for (path, content) in files {
            let full = temp_dir.path().join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, content).unwrap();
        }
        let cache = SnapshotCache::new(temp_dir.path());
        cache.ensure_mirror(Path::new("src")).unwrap();
        (temp_dir, cache)
    }

    fn run(
        cache: &SnapshotCache,
        root: &Path,
        changed: &ChangedSet,
        toolchain: &FakeToolchain,
    ) -> BuildResult<(PlanOutcome, Vec<PathBuf>)> {
        let mut objects = Vec::new();
        let outcome = compile_sources(
            cache,
            &root.join("src"),
            "main.c",
            changed,
            toolchain,
            &mut objects,
            false,
        )?;
        Ok((outcome, objects))
    }

    #[test]
    fn test_first_run_compiles_everything() {
        let (temp_dir, cache) = fixture(&[
            ("src/main.c", "int main(void) { return 0; }\n"),
            ("src/util.c", "int util(void) { return 1; }\n"),
        ]);
        let toolchain = FakeToolchain::default();

        let (outcome, objects) =
            run(&cache, temp_dir.path(), &ChangedSet::new(), &toolchain).unwrap();

        assert_eq!(outcome.compiled, 1);
        assert_eq!(objects.len(), 1);
        assert_eq!(walker::base_name(&outcome.main_source), "main.c");
        assert_eq!(*toolchain.compiled.borrow(), vec!["util.c"]);
    }

    #[test]
    fn test_second_run_is_idempotent() {
        let (temp_dir, cache) = fixture(&[
            ("src/main.c", "int main(void) { return 0; }\n"),
            ("src/util.c", "int util(void) { return 1; }\n"),
        ]);
        let toolchain = FakeToolchain::default();
        let (_, first_objects) =
            run(&cache, temp_dir.path(), &ChangedSet::new(), &toolchain).unwrap();

        let (outcome, second_objects) =
            run(&cache, temp_dir.path(), &ChangedSet::new(), &toolchain).unwrap();

        assert_eq!(outcome.compiled, 0);
        assert!(outcome.units.iter().all(|u| u.up_to_date));
        assert_eq!(first_objects, second_objects);
    }

    #[test]
    fn test_changed_header_invalidates_object() {
        let (temp_dir, cache) = fixture(&[
            ("src/main.c", "int main(void) { return 0; }\n"),
            ("src/util.c", "#include \"util.h\"\nint util(void) { return 1; }\n"),
            ("src/other.c", "int other(void) { return 2; }\n"),
        ]);
        let toolchain = FakeToolchain::default();
        run(&cache, temp_dir.path(), &ChangedSet::new(), &toolchain).unwrap();
        toolchain.compiled.borrow_mut().clear();

        let mut changed = ChangedSet::new();
        changed.insert("util.h");
        let (outcome, _) = run(&cache, temp_dir.path(), &changed, &toolchain).unwrap();

        // util.c includes util.h and must recompile; other.c must not.
        assert_eq!(outcome.compiled, 1);
        assert_eq!(*toolchain.compiled.borrow(), vec!["util.c"]);
    }

    #[test]
    fn test_duplicate_main_is_fatal() {
        let (temp_dir, cache) = fixture(&[
            ("src/main.c", "int main(void) { return 0; }\n"),
            ("src/sub/main.c", "int main(void) { return 0; }\n"),
        ]);
        let toolchain = FakeToolchain::default();

        let result = run(&cache, temp_dir.path(), &ChangedSet::new(), &toolchain);
        assert!(matches!(result, Err(BuildError::DuplicateMain { .. })));
    }

    #[test]
    fn test_missing_main_is_fatal() {
        let (temp_dir, cache) = fixture(&[("src/util.c", "int util(void) { return 1; }\n")]);
        let toolchain = FakeToolchain::default();

        let result = run(&cache, temp_dir.path(), &ChangedSet::new(), &toolchain);
        assert!(matches!(result, Err(BuildError::MissingMain { .. })));
    }

    #[test]
    fn test_failed_compile_leaves_mirror_stale() {
        struct FailingToolchain;
        impl Toolchain for FailingToolchain {
            fn compile(&self, job: &CompileJob<'_>) -> BuildResult<()> {
                Err(BuildError::compiler_exit(walker::base_name(job.source), Some(1)))
            }
            fn link(&self, _job: &crate::compiler::LinkJob<'_>) -> BuildResult<()> {
                Ok(())
            }
        }

        let (temp_dir, cache) = fixture(&[
            ("src/main.c", "int main(void) { return 0; }\n"),
            ("src/util.c", "int util(void) { return 1; }\n"),
        ]);

        let result = run_with(&cache, temp_dir.path(), &FailingToolchain);
        assert!(matches!(result, Err(BuildError::CompilerExit { .. })));

        // Mirror was never committed, so the unit is retried next run.
        assert!(cache
            .is_changed(&temp_dir.path().join("src/util.c"))
            .unwrap());
    }

    fn run_with(
        cache: &SnapshotCache,
        root: &Path,
        toolchain: &dyn Toolchain,
    ) -> BuildResult<PlanOutcome> {
        let mut objects = Vec::new();
        compile_sources(
            cache,
            &root.join("src"),
            "main.c",
            &ChangedSet::new(),
            toolchain,
            &mut objects,
            false,
        )
    }
}
