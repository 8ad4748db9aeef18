//! External compiler invocation
//!
//! The pipeline talks to the compiler through the [`Toolchain`] trait so
//! tests can substitute a recording fake. The real implementation shells
//! out to `gcc`, one blocking subprocess at a time; a non-zero exit status
//! is fatal to the whole run.

use crate::error::{BuildError, BuildResult};
use crate::walker;
use mason_config::{BuildMode, ProjectConfig};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Warning flags passed to every compile and link command
const BASE_FLAGS: [&str; 3] = ["-Wall", "-Wextra", "-Wno-unused-parameter"];
/// Extra flags for production builds
const PROD_FLAGS: [&str; 2] = ["-O3", "-DPROD_BUILD"];

/// Include, library-path, and link flags accumulated from configuration
#[derive(Debug, Clone, Default)]
pub struct FlagSet {
    /// `-I<dir>` entries; the project directory always comes first
    pub includes: Vec<String>,
    /// `-L<dir>` entries
    pub lib_dirs: Vec<String>,
    /// `-l<name>` entries
    pub links: Vec<String>,
}

impl FlagSet {
    /// Build the flag set from a loaded project configuration
    pub fn from_config(config: &ProjectConfig) -> Self {
        let mut includes = vec![format!("-I{}", config.project_dir.display())];
        includes.extend(
            config
                .include_dirs
                .iter()
                .map(|d| format!("-I{}", d.display())),
        );
        Self {
            includes,
            lib_dirs: config
                .lib_dirs
                .iter()
                .map(|d| format!("-L{}", d.display()))
                .collect(),
            links: config.link_libs.iter().map(|l| format!("-l{}", l)).collect(),
        }
    }

    fn apply(&self, command: &mut Command) {
        command.args(&self.includes);
        command.args(&self.lib_dirs);
        command.args(&self.links);
    }
}

/// One source-to-object compilation
#[derive(Debug)]
pub struct CompileJob<'a> {
    pub source: &'a Path,
    pub object: &'a Path,
}

/// Final link of the main source plus the accumulated object set
#[derive(Debug)]
pub struct LinkJob<'a> {
    pub main_source: &'a Path,
    pub objects: &'a [PathBuf],
    pub output: &'a Path,
}

/// Seam between the build planner and the external compiler
pub trait Toolchain {
    /// Compile one source file to an object file
    fn compile(&self, job: &CompileJob<'_>) -> BuildResult<()>;
    /// Link the main source and object set into the final executable
    fn link(&self, job: &LinkJob<'_>) -> BuildResult<()>;
}

/// `gcc`-backed toolchain
#[derive(Debug, Clone)]
pub struct Gcc {
    flags: FlagSet,
    mode: BuildMode,
    working_dir: PathBuf,
}

impl Gcc {
    /// Create a toolchain running `gcc` from `working_dir`
    pub fn new(flags: FlagSet, mode: BuildMode, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            flags,
            mode,
            working_dir: working_dir.into(),
        }
    }

    fn base_command(&self) -> Command {
        let mut command = Command::new("gcc");
        command.current_dir(&self.working_dir);
        command.args(BASE_FLAGS);
        command
    }

    fn run(&self, mut command: Command, unit: String) -> BuildResult<()> {
        if self.mode.is_prod() {
            command.args(PROD_FLAGS);
        }
        let status = command.status().map_err(|error| BuildError::CompilerSpawn {
            program: "gcc".to_string(),
            error,
        })?;
        if !status.success() {
            return Err(BuildError::compiler_exit(unit, status.code()));
        }
        Ok(())
    }
}

impl Toolchain for Gcc {
    fn compile(&self, job: &CompileJob<'_>) -> BuildResult<()> {
        let mut command = self.base_command();
        command.arg("-c").arg(job.source);
        self.flags.apply(&mut command);
        command.arg("-o").arg(job.object);
        self.run(command, walker::base_name(job.source))
    }

    fn link(&self, job: &LinkJob<'_>) -> BuildResult<()> {
        let mut command = self.base_command();
        command.arg(job.main_source);
        command.args(job.objects);
        self.flags.apply(&mut command);
        command.arg("-o").arg(job.output);
        self.run(command, walker::base_name(job.output))
    }
}
