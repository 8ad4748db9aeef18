//! Line-level style checks
//!
//! All checks are textual heuristics over raw lines; none of them parse C.
//! Each finding is a counted violation, never fatal.

use crate::report::{Violation, ViolationKind};
use std::path::Path;

/// Maximum supported line length in bytes
pub const MAX_LINE_LEN: usize = 4096;

/// Files allowed to call the raw allocator directly (the wrappers live here)
pub const APPROVED_ALLOC_FILES: [&str; 2] = ["alloc.c", "alloc.h"];

/// Raw allocation/deallocation calls disallowed outside the wrappers
const RAW_ALLOC_CALLS: [&str; 4] = ["malloc", "calloc", "realloc", "free"];

/// Checks applied to every project file: emptiness, overlong lines,
/// consecutive blank lines, raw allocator calls.
pub fn check_lines(path: &Path, text: &str) -> Vec<Violation> {
    let mut violations = Vec::new();
    let file_name = base_name(path);
    let alloc_exempt = APPROVED_ALLOC_FILES.contains(&file_name.as_str());

    let mut line_count = 0usize;
    let mut blank_run = 0usize;

    for (idx, line) in text.lines().enumerate() {
        line_count += 1;
        let line_no = idx + 1;

        if line.len() >= MAX_LINE_LEN {
            violations.push(violation(path, Some(line_no), ViolationKind::OverlongLine,
                format!("{} bytes", line.len())));
        }

        if line.trim().is_empty() {
            blank_run += 1;
            // One report per run, at the line where it becomes a run.
            if blank_run == 2 {
                violations.push(violation(path, Some(line_no),
                    ViolationKind::ConsecutiveBlankLines, String::new()));
            }
        } else {
            blank_run = 0;
        }

        if !alloc_exempt {
            if let Some(call) = raw_alloc_call(line) {
                violations.push(violation(path, Some(line_no),
                    ViolationKind::RawAllocation, call.to_string()));
            }
        }
    }

    if line_count == 0 {
        violations.push(violation(path, None, ViolationKind::EmptyFile, String::new()));
    }

    violations
}

/// Header-only checks: guard discipline plus prototype/implementation
/// pairing against the paired source's text (if any).
pub fn check_header(path: &Path, text: &str, paired_source: Option<&str>) -> Vec<Violation> {
    let mut violations = Vec::new();
    let lines: Vec<&str> = text.lines().collect();
    if lines.is_empty() {
        // Emptiness is already reported by check_lines.
        return violations;
    }

    let guard = guard_token(&base_name(path));
    let expect_ifndef = format!("#ifndef {}", guard);
    let expect_define = format!("#define {}", guard);
    let first = lines[0].trim_end();
    let second = lines.get(1).map(|l| l.trim_end()).unwrap_or("");
    if first != expect_ifndef || second != expect_define {
        violations.push(violation(path, Some(1), ViolationKind::MissingGuard,
            format!("expected {} / {}", expect_ifndef, expect_define)));
    }

    if !lines.iter().any(|l| l.trim_start().starts_with("#endif")) {
        violations.push(violation(path, None, ViolationKind::UnclosedGuard, guard));
    }

    for (idx, line) in lines.iter().enumerate() {
        let Some(prototype) = parse_prototype(line) else {
            continue;
        };
        match paired_source {
            Some(source) if source.contains(&format!("{} {{", prototype)) => {}
            Some(source) if source.contains(&format!("{}{{", prototype)) => {
                violations.push(violation(path, Some(idx + 1),
                    ViolationKind::BraceSpacing, prototype));
            }
            _ => {
                violations.push(violation(path, Some(idx + 1),
                    ViolationKind::MissingImplementation, prototype));
            }
        }
    }

    violations
}

/// Expected guard token for a header file name: uppercased, `.` → `_`
pub fn guard_token(file_name: &str) -> String {
    file_name.to_uppercase().replace('.', "_")
}

/// Detect a function prototype on one line.
///
/// Deliberately a character-scan heuristic, not a parser: some non-space
/// text, whitespace, a token directly followed by `(`, a non-nested `)`,
/// optional whitespace, `;`. Returns the prototype text up to and
/// including the `)`.
pub fn parse_prototype(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.starts_with('#') {
        return None;
    }

    let open = trimmed.find('(')?;
    // The token before `(` must be preceded by whitespace which is itself
    // preceded by something (the return type).
    let head = &trimmed[..open];
    let name_start = head.rfind(char::is_whitespace).map(|i| i + 1)?;
    if name_start == 0 || head[name_start..].is_empty() || head[..name_start].trim().is_empty() {
        return None;
    }

    let rest = &trimmed[open + 1..];
    let close = rest.find(')')?;
    if rest[..close].contains('(') {
        return None;
    }

    let after = rest[close + 1..].trim_start();
    if !after.starts_with(';') {
        return None;
    }

    Some(trimmed[..open + 1 + close + 1].to_string())
}

/// Find a raw allocator call on a line, honoring word boundaries so
/// wrapper names like `arena_free` do not match.
fn raw_alloc_call(line: &str) -> Option<&'static str> {
    for call in RAW_ALLOC_CALLS {
        let mut search_from = 0;
        while let Some(pos) = line[search_from..].find(call) {
            let start = search_from + pos;
            let end = start + call.len();
            let boundary_before = start == 0
                || !line[..start]
                    .chars()
                    .next_back()
                    .is_some_and(|c| c.is_alphanumeric() || c == '_');
            let followed_by_call = line[end..].trim_start().starts_with('(');
            if boundary_before && followed_by_call {
                return Some(call);
            }
            search_from = end;
        }
    }
    None
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn violation(path: &Path, line: Option<usize>, kind: ViolationKind, detail: String) -> Violation {
    Violation {
        file: path.to_path_buf(),
        line,
        kind,
        detail,
    }
}
