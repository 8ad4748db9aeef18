//! Project configuration types

use std::fmt;
use std::path::PathBuf;

/// Build mode selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildMode {
    /// Unoptimized development build
    #[default]
    Debug,
    /// Optimized production build (`-O3 -DPROD_BUILD`)
    Prod,
}

impl BuildMode {
    /// Whether production optimization flags should be passed to the compiler
    pub fn is_prod(&self) -> bool {
        matches!(self, Self::Prod)
    }
}

/// Parsed project configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    /// Root of the project source tree
    pub project_dir: PathBuf,
    /// Base-name of the main translation unit
    pub main_file: String,
    /// Extra include directories (`INCLUDE`)
    pub include_dirs: Vec<PathBuf>,
    /// Libraries to link (`LINK`)
    pub link_libs: Vec<String>,
    /// Library search directories (`LIB`)
    pub lib_dirs: Vec<PathBuf>,
    /// External translation units or directories of them (`SOURCE`)
    pub vendor_sources: Vec<PathBuf>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from("src"),
            main_file: "main.c".to_string(),
            include_dirs: Vec::new(),
            link_libs: Vec::new(),
            lib_dirs: Vec::new(),
            vendor_sources: Vec::new(),
        }
    }
}

/// A non-fatal configuration problem, reported and skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    /// 1-based line number in the configuration file
    pub line: usize,
    /// The unrecognized key
    pub key: String,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown key \"{}\" on line {} - skipping",
            self.key, self.line
        )
    }
}
