//! Mason include auditor
//!
//! An advisory analysis pass over a project tree, independent of the build
//! pipeline. Two analyses run per file:
//!
//! - **Include-graph analysis** (headers): builds per-header primary and
//!   transitive (secondary) include sets, treats include cycles as fatal,
//!   and flags includes that are redundant because they are already
//!   reachable through another include.
//! - **Line-level style analysis** (every file): overlong lines, stacked
//!   blank lines, header-guard discipline, raw allocator calls outside the
//!   approved wrappers, and header prototypes with no implementation in the
//!   paired source.
//!
//! All detection is textual-heuristic by design; nothing here parses C.
//! Violations accumulate into a report and never affect the exit code; only
//! fatal conditions (unreadable file, include cycle) do.

pub mod auditor;
pub mod graph;
pub mod report;
pub mod style;

use std::path::PathBuf;
use thiserror::Error;

/// Auditor errors. Everything here is fatal; style findings are not errors.
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Project directory not found: {0}")]
    MissingProjectDir(PathBuf),

    #[error("Recursive include detected: {chain}")]
    IncludeCycle { chain: String },

    #[error("Unable to read file {path}: {error}")]
    IoError {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("Directory traversal failed: {0}")]
    Walk(#[from] walkdir::Error),
}

impl AuditError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            error,
        }
    }
}

/// Result type for audit operations
pub type AuditResult<T> = Result<T, AuditError>;

// Re-export main types
pub use auditor::Auditor;
pub use graph::{parse_include_token, HeaderNode, IncludeGraph};
pub use report::{AuditReport, Severity, Tier, Violation, ViolationKind};
