//! Build orchestration
//!
//! [`Builder`] runs the full pipeline: ensure the mirror, consolidate
//! vendors, compute the changed-header closure, compile stale sources, and
//! link. Every stage passes its results forward explicitly; there is no
//! process-wide state, so a `Builder` can be rooted anywhere (which is how
//! the integration tests run it inside temp directories).

use crate::cache::SnapshotCache;
use crate::compiler::{FlagSet, Gcc, LinkJob, Toolchain};
use crate::deps;
use crate::error::{BuildError, BuildResult};
use crate::planner;
use crate::vendor;
use mason_config::{BuildMode, ConfigWarning, ProjectConfig};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Final executable artifact, relative to the workspace root
pub const OUTPUT_BINARY: &str = "build/bin.exe";

/// Build statistics
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    /// Size of the changed-header closure
    pub changed_headers: usize,
    /// Non-main units visited
    pub total_units: usize,
    /// Units actually recompiled
    pub compiled_units: usize,
    /// Whether the vendor unit was recompiled
    pub vendors_compiled: bool,
    /// Whether the final link ran
    pub linked: bool,
    /// Time spent computing the changed-header closure
    pub dependency_time: Duration,
    /// Time spent compiling
    pub compilation_time: Duration,
    /// Time spent linking
    pub linking_time: Duration,
    /// Total build time
    pub total_time: Duration,
}

/// Result of a successful build
#[derive(Debug)]
pub struct BuildContext {
    /// Build statistics
    pub stats: BuildStats,
    /// Ordered object set handed to the linker
    pub objects: Vec<PathBuf>,
    /// Final executable path
    pub executable: PathBuf,
}

/// Main builder for orchestrating builds
pub struct Builder {
    root: PathBuf,
    config: ProjectConfig,
    warnings: Vec<ConfigWarning>,
    mode: BuildMode,
    verbose: bool,
}

impl Builder {
    /// Create a builder for the workspace rooted at `root`, loading
    /// `.masonconf` from there (defaults apply when it is absent).
    pub fn new(root: impl AsRef<Path>) -> BuildResult<Self> {
        let root = root.as_ref().to_path_buf();
        let loaded = mason_config::load_from_dir(&root)?;
        Ok(Self {
            root,
            config: loaded.config,
            warnings: loaded.warnings,
            mode: BuildMode::Debug,
            verbose: false,
        })
    }

    /// Set the build mode
    pub fn with_mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }

    /// Enable/disable verbose output
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// The loaded project configuration
    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// Warnings produced while loading the configuration
    pub fn warnings(&self) -> &[ConfigWarning] {
        &self.warnings
    }

    /// The `gcc` toolchain matching this builder's configuration and mode
    pub fn default_toolchain(&self) -> Gcc {
        Gcc::new(FlagSet::from_config(&self.config), self.mode, &self.root)
    }

    /// Execute the build
    pub fn build(&self, toolchain: &dyn Toolchain) -> BuildResult<BuildContext> {
        let build_start = Instant::now();

        let project_root = self.root.join(&self.config.project_dir);
        if !project_root.is_dir() {
            return Err(BuildError::MissingProjectDir(project_root));
        }

        let cache = SnapshotCache::new(&self.root);
        cache.ensure_mirror(&self.config.project_dir)?;

        let mut objects = Vec::new();

        // Vendors first, so their object leads the object set.
        let vendor_sources =
            vendor::collect_vendor_sources(&self.root, &self.config.vendor_sources)?;
        let vendors_compiled = vendor::compile_vendors(
            &self.root,
            &vendor_sources,
            toolchain,
            &mut objects,
            self.verbose,
        )?;

        // Changed-header closure. Changed headers are committed as found.
        let dep_start = Instant::now();
        let mut changed = deps::seed_changed_headers(&cache, &project_root)?;
        deps::propagate(&project_root, &mut changed)?;
        let dependency_time = dep_start.elapsed();

        if self.verbose {
            println!("  {} changed header(s)", changed.len());
        }

        // Compile stale sources.
        let compile_start = Instant::now();
        let outcome = planner::compile_sources(
            &cache,
            &project_root,
            &self.config.main_file,
            &changed,
            toolchain,
            &mut objects,
            self.verbose,
        )?;
        let compilation_time = compile_start.elapsed();

        // Link, unless nothing was recompiled, the executable exists, and
        // the main unit itself is unchanged. The main unit is never compiled
        // to an object, so a closure hit on its includes must force the
        // relink here, the same way the planner invalidates objects.
        let executable = self.root.join(OUTPUT_BINARY);
        let main_changed = cache.is_changed(&outcome.main_source)?
            || deps::includes_changed_header(&outcome.main_source, &changed)?;
        let link_needed = outcome.compiled > 0
            || vendors_compiled
            || !executable.is_file()
            || main_changed;

        let link_start = Instant::now();
        if link_needed {
            if self.verbose {
                println!("  Linking {}", executable.display());
            }
            toolchain.link(&LinkJob {
                main_source: &outcome.main_source,
                objects: &objects,
                output: &executable,
            })?;
            cache.commit(&outcome.main_source)?;
        }
        let linking_time = link_start.elapsed();

        Ok(BuildContext {
            stats: BuildStats {
                changed_headers: changed.len(),
                total_units: outcome.units.len(),
                compiled_units: outcome.compiled,
                vendors_compiled,
                linked: link_needed,
                dependency_time,
                compilation_time,
                linking_time,
                total_time: build_start.elapsed(),
            },
            objects,
            executable,
        })
    }
}
