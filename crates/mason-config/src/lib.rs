//! Mason configuration system
//!
//! Loads project configuration from a `.masonconf` file in the working
//! directory. The format is line-oriented `KEY value` pairs:
//!
//! - `PROJECT <dir>` — project source tree (default `src`)
//! - `MAIN <filename>` — main translation unit base-name (default `main.c`)
//! - `INCLUDE <dir>` — extra include directory
//! - `LINK <name>` — library to link (`-l<name>`)
//! - `LIB <dir>` — library search directory
//! - `SOURCE <path-or-directory>` — external (vendor) translation units
//!
//! Unrecognized keys are collected as warnings and skipped, never fatal.
//! A missing `.masonconf` yields the defaults.

pub mod loader;
pub mod project;

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file {path}: {error}")]
    ReadError {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

// Re-export main types
pub use loader::{load_from_dir, parse_str, LoadedConfig, CONFIG_FILE};
pub use project::{BuildMode, ConfigWarning, ProjectConfig};
