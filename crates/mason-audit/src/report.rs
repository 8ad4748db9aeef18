//! Violation accumulation and reporting

use std::fmt;
use std::path::PathBuf;

/// Violation severity. Most findings are major; formatting nits are minor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Minor,
    Major,
}

/// Kinds of counted (never fatal) findings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// Line at or beyond the maximum supported length
    OverlongLine,
    /// Two or more consecutive blank/whitespace-only lines
    ConsecutiveBlankLines,
    /// First two lines are not the expected `#ifndef`/`#define` guard
    MissingGuard,
    /// Guard never closed by an `#endif` line
    UnclosedGuard,
    /// Raw allocator/deallocator call outside the approved wrappers
    RawAllocation,
    /// Header prototype with no implementation in the paired source
    MissingImplementation,
    /// Implementation found, but with no space before the opening brace
    BraceSpacing,
    /// Include already reachable transitively through another include
    UselessInclude,
    /// File with zero lines
    EmptyFile,
}

impl ViolationKind {
    pub fn severity(&self) -> Severity {
        match self {
            Self::BraceSpacing => Severity::Minor,
            _ => Severity::Major,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Self::OverlongLine => "line exceeds maximum supported length",
            Self::ConsecutiveBlankLines => "consecutive blank lines",
            Self::MissingGuard => "missing or incorrect header guard",
            Self::UnclosedGuard => "header guard never closed by #endif",
            Self::RawAllocation => "raw memory management outside approved wrappers",
            Self::MissingImplementation => "prototype has no implementation in paired source",
            Self::BraceSpacing => "implementation brace not preceded by a space",
            Self::UselessInclude => "useless include (already reachable transitively)",
            Self::EmptyFile => "file is empty",
        }
    }
}

/// One counted finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File the finding applies to
    pub file: PathBuf,
    /// 1-based line number, when the finding is line-scoped
    pub line: Option<usize>,
    pub kind: ViolationKind,
    /// Short free-form detail (guard token, include name, prototype, ...)
    pub detail: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(
                f,
                "{}:{}: {}: {}",
                self.file.display(),
                line,
                self.kind.describe(),
                self.detail
            ),
            None => write!(
                f,
                "{}: {}: {}",
                self.file.display(),
                self.kind.describe(),
                self.detail
            ),
        }
    }
}

/// Severity tier for the final violation count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// No violations
    Clean,
    /// At most ten violations
    Low,
    /// More than ten violations
    High,
}

impl Tier {
    pub fn from_count(count: usize) -> Self {
        match count {
            0 => Self::Clean,
            1..=10 => Self::Low,
            _ => Self::High,
        }
    }
}

/// Accumulated audit findings for one run
#[derive(Debug, Default)]
pub struct AuditReport {
    violations: Vec<Violation>,
}

impl AuditReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    pub fn extend(&mut self, violations: impl IntoIterator<Item = Violation>) {
        self.violations.extend(violations);
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn total(&self) -> usize {
        self.violations.len()
    }

    pub fn count_of(&self, severity: Severity) -> usize {
        self.violations
            .iter()
            .filter(|v| v.kind.severity() == severity)
            .count()
    }

    pub fn tier(&self) -> Tier {
        Tier::from_count(self.total())
    }
}
