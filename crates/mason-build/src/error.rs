/// Build pipeline error types
use std::path::PathBuf;
use thiserror::Error;

pub type BuildResult<T> = Result<T, BuildError>;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Project directory not found: {0}")]
    MissingProjectDir(PathBuf),

    #[error("Another main file detected: {second} (first was {first})")]
    DuplicateMain { first: PathBuf, second: PathBuf },

    #[error("Unable to build without a detected \"{expected}\" file")]
    MissingMain { expected: String },

    #[error("Failed to start compiler '{program}': {error}")]
    CompilerSpawn {
        program: String,
        error: std::io::Error,
    },

    #[error("Building \"{unit}\" failed (compiler exit code {code:?})")]
    CompilerExit { unit: String, code: Option<i32> },

    #[error("Directory traversal failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("I/O error at {path}: {error}")]
    IoError {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] mason_config::ConfigError),
}

impl BuildError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            error,
        }
    }

    /// Create a compiler-exit error for the given unit
    pub fn compiler_exit(unit: impl Into<String>, code: Option<i32>) -> Self {
        Self::CompilerExit {
            unit: unit.into(),
            code,
        }
    }
}
