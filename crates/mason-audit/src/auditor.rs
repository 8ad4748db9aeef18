//! Audit orchestration
//!
//! One pass over the project tree: scan every file once, build the include
//! graph from the headers, then emit violations. There are only two states
//! (scanning, then reporting) and nothing persists between runs. Any file
//! that cannot be read is fatal.

use crate::graph::{parse_include_token, IncludeGraph};
use crate::report::{AuditReport, Violation, ViolationKind};
use crate::style;
use crate::{AuditError, AuditResult};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Include-graph and style auditor for one project tree
pub struct Auditor {
    project_root: PathBuf,
}

impl Auditor {
    /// Create an auditor over the given project source tree
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
        }
    }

    /// Run the full audit. Include cycles and unreadable files are fatal;
    /// everything else accumulates into the returned report.
    pub fn run(&self) -> AuditResult<AuditReport> {
        if !self.project_root.is_dir() {
            return Err(AuditError::MissingProjectDir(self.project_root.clone()));
        }

        // Scan: read every file once, in sorted order for deterministic
        // reporting.
        let mut files: Vec<(PathBuf, String)> = Vec::new();
        for entry in WalkDir::new(&self.project_root).min_depth(1).follow_links(false) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path().to_path_buf();
            let text = fs::read_to_string(&path).map_err(|e| AuditError::io(&path, e))?;
            files.push((path, text));
        }
        files.sort_by(|a, b| a.0.cmp(&b.0));

        let mut graph = IncludeGraph::new();
        let mut source_texts: HashMap<String, String> = HashMap::new();
        for (path, text) in &files {
            let name = base_name(path);
            if name.ends_with(".h") {
                graph.add_header(name, path.clone(), include_tokens(text));
            } else if name.ends_with(".c") {
                source_texts.insert(name, text.clone());
            }
        }

        // A cycle terminates the audit before any violation is reported.
        graph.resolve_secondary()?;

        let mut report = AuditReport::new();

        for (path, token, _) in graph.useless_includes() {
            report.push(Violation {
                file: path,
                line: None,
                kind: ViolationKind::UselessInclude,
                detail: token,
            });
        }

        for (path, text) in &files {
            let name = base_name(path);

            report.extend(style::check_lines(path, text));

            if name.ends_with(".h") {
                let paired = source_texts.get(&paired_source_name(&name));
                report.extend(style::check_header(path, text, paired.map(String::as_str)));
            } else if name.ends_with(".c") {
                let header_name = format!("{}.h", name.trim_end_matches(".c"));
                for token in graph.redundant_against(&header_name, &include_tokens(text)) {
                    report.push(Violation {
                        file: path.clone(),
                        line: None,
                        kind: ViolationKind::UselessInclude,
                        detail: token,
                    });
                }
            }
        }

        Ok(report)
    }
}

/// All include tokens of a file, in line order
fn include_tokens(text: &str) -> Vec<String> {
    text.lines().filter_map(parse_include_token).collect()
}

/// `util.h` → `util.c`
fn paired_source_name(header_name: &str) -> String {
    format!("{}.c", header_name.trim_end_matches(".h"))
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
