//! Integration tests for the auditor
//!
//! Each test lays out a small project tree in a temp directory and runs the
//! full audit over it.

use mason_audit::{AuditError, Auditor, Tier, ViolationKind};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::fs;
use tempfile::TempDir;

fn create_project(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (path, content) in files {
        let full = dir.path().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full, content).unwrap();
    }
    dir
}

const CLEAN_HEADER: &str = "#ifndef UTIL_H\n#define UTIL_H\nint util(void);\n#endif\n";
const CLEAN_SOURCE: &str = "#include \"util.h\"\nint util(void) {\n    return 1;\n}\n";

#[test]
fn test_clean_project_reports_nothing() {
    let project = create_project(&[
        ("src/util.h", CLEAN_HEADER),
        ("src/util.c", CLEAN_SOURCE),
        ("src/main.c", "#include \"util.h\"\nint main(void) {\n    return util();\n}\n"),
    ]);

    let report = Auditor::new(project.path().join("src")).run().unwrap();

    assert_eq!(report.total(), 0, "unexpected: {:?}", report.violations());
    assert_eq!(report.tier(), Tier::Clean);
}

#[rstest]
#[case::two_cycle(&[
    ("src/h1.h", "#include \"h2.h\"\n"),
    ("src/h2.h", "#include \"h1.h\"\n"),
])]
#[case::self_include(&[("src/h.h", "#include \"h.h\"\n")])]
fn test_include_cycle_is_fatal_with_no_report(#[case] files: &[(&str, &str)]) {
    // The headers also have broken guards; the cycle must win and no
    // violation report may be produced.
    let project = create_project(files);

    let result = Auditor::new(project.path().join("src")).run();
    assert!(matches!(result, Err(AuditError::IncludeCycle { .. })));
}

#[test]
fn test_useless_include_counted_once() {
    let project = create_project(&[
        (
            "src/top.h",
            "#ifndef TOP_H\n#define TOP_H\n#include \"x.h\"\n#include \"mid.h\"\n#endif\n",
        ),
        (
            "src/mid.h",
            "#ifndef MID_H\n#define MID_H\n#include \"x.h\"\n#endif\n",
        ),
        ("src/x.h", "#ifndef X_H\n#define X_H\n#endif\n"),
    ]);

    let report = Auditor::new(project.path().join("src")).run().unwrap();

    let useless: Vec<_> = report
        .violations()
        .iter()
        .filter(|v| v.kind == ViolationKind::UselessInclude)
        .collect();
    assert_eq!(useless.len(), 1);
    assert_eq!(useless[0].detail, "x.h");
    assert!(useless[0].file.ends_with("top.h"));
}

#[test]
fn test_source_include_redundant_through_paired_header() {
    // app.c includes base.h, but app.h already reaches base.h through
    // core.h, so the source include is redundant.
    let project = create_project(&[
        (
            "src/app.h",
            "#ifndef APP_H\n#define APP_H\n#include \"core.h\"\n#endif\n",
        ),
        (
            "src/core.h",
            "#ifndef CORE_H\n#define CORE_H\n#include \"base.h\"\n#endif\n",
        ),
        ("src/base.h", "#ifndef BASE_H\n#define BASE_H\n#endif\n"),
        ("src/app.c", "#include \"app.h\"\n#include \"base.h\"\nint app;\n"),
    ]);

    let report = Auditor::new(project.path().join("src")).run().unwrap();

    let useless: Vec<_> = report
        .violations()
        .iter()
        .filter(|v| v.kind == ViolationKind::UselessInclude)
        .collect();
    assert_eq!(useless.len(), 1);
    assert!(useless[0].file.ends_with("app.c"));
    assert_eq!(useless[0].detail, "base.h");
}

#[test]
fn test_bad_guard_reported() {
    let project = create_project(&[(
        "src/util.h",
        "#ifndef WRONG\n#define WRONG\nint util(void);\n#endif\n",
    ),
    ("src/util.c", "int util(void) {\n    return 1;\n}\n")]);

    let report = Auditor::new(project.path().join("src")).run().unwrap();

    assert!(report
        .violations()
        .iter()
        .any(|v| v.kind == ViolationKind::MissingGuard));
    assert_eq!(report.tier(), Tier::Low);
}

#[test]
fn test_empty_file_reported() {
    let project = create_project(&[("src/empty.c", ""), ("src/main.c", "int main(void) {\n    return 0;\n}\n")]);

    let report = Auditor::new(project.path().join("src")).run().unwrap();

    let empties: Vec<_> = report
        .violations()
        .iter()
        .filter(|v| v.kind == ViolationKind::EmptyFile)
        .collect();
    assert_eq!(empties.len(), 1);
    assert!(empties[0].file.ends_with("empty.c"));
}

#[test]
fn test_missing_implementation_reported() {
    let project = create_project(&[
        (
            "src/util.h",
            "#ifndef UTIL_H\n#define UTIL_H\nint util(void);\nint helper(int a);\n#endif\n",
        ),
        ("src/util.c", "int util(void) {\n    return 1;\n}\n"),
    ]);

    let report = Auditor::new(project.path().join("src")).run().unwrap();

    let missing: Vec<_> = report
        .violations()
        .iter()
        .filter(|v| v.kind == ViolationKind::MissingImplementation)
        .collect();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].detail, "int helper(int a)");
}

#[test]
fn test_high_tier_above_ten_violations() {
    // Twelve raw allocation calls in one file.
    let body: String = (0..12)
        .map(|i| format!("char* p{} = malloc({});\n", i, i + 1))
        .collect();
    let project = create_project(&[("src/leaky.c", body.as_str())]);

    let report = Auditor::new(project.path().join("src")).run().unwrap();

    assert!(report.total() > 10);
    assert_eq!(report.tier(), Tier::High);
}

#[test]
fn test_missing_project_dir_is_fatal() {
    let project = create_project(&[]);
    let result = Auditor::new(project.path().join("src")).run();
    assert!(matches!(result, Err(AuditError::MissingProjectDir(_))));
}

#[test]
fn test_multi_segment_include_matches_first_segment_only() {
    // Pinning the known ambiguity: "sub/x.h" contributes the token "sub",
    // not "x.h", so the nested header is never linked into the graph by
    // that include and no redundancy is detected through it.
    let project = create_project(&[
        (
            "src/top.h",
            "#ifndef TOP_H\n#define TOP_H\n#include \"sub/x.h\"\n#include \"x.h\"\n#endif\n",
        ),
        ("src/sub/x.h", "#ifndef X_H\n#define X_H\n#endif\n"),
        ("src/x.h", "#ifndef X_H\n#define X_H\n#endif\n"),
    ]);

    let report = Auditor::new(project.path().join("src")).run().unwrap();

    assert!(!report
        .violations()
        .iter()
        .any(|v| v.kind == ViolationKind::UselessInclude));
}
