//! Mason build pipeline
//!
//! Provides the incremental build path for Mason projects:
//! - Snapshot cache mirroring every project file for byte-level change
//!   detection
//! - Change propagation from edited headers to every dependent header
//! - Build planning (which translation units must recompile, and whether
//!   the final link can be skipped)
//! - External compiler invocation through a swappable toolchain seam
//! - Vendor source consolidation
//!
//! Everything is single-threaded and run-to-completion: the pipeline's
//! accumulators (changed set, object set) live for one run and are threaded
//! through the stages explicitly.

pub mod builder;
pub mod cache;
pub mod compiler;
pub mod deps;
pub mod error;
pub mod planner;
pub mod vendor;
pub mod walker;

// Re-export main types
pub use builder::{BuildContext, BuildStats, Builder, OUTPUT_BINARY};
pub use cache::{SnapshotCache, CACHE_DIR, VENDOR_DIR};
pub use compiler::{CompileJob, FlagSet, Gcc, LinkJob, Toolchain};
pub use deps::ChangedSet;
pub use error::{BuildError, BuildResult};
pub use planner::{BuildUnit, PlanOutcome};

// Re-export configuration types for convenience
pub use mason_config::{BuildMode, ProjectConfig};
