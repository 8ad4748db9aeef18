//! Include-graph analysis
//!
//! Headers are identified by base-name. Each header's `#include` lines
//! contribute primary edges; the secondary set is everything reachable
//! through a primary include, computed iteratively with an explicit stack
//! so cycle detection is a set-membership check on the current expansion
//! chain rather than a call-stack property. A cycle is fatal to the whole
//! audit; a primary include that also appears in the secondary set is a
//! counted "useless include".

use crate::{AuditError, AuditResult};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

/// Extract the include token from an `#include` line.
///
/// Only the token between the opening `"`/`<` and the first path separator
/// or closing delimiter is retained, so a multi-segment include like
/// `"sub/dir/header.h"` yields `sub`. Matching is deliberately
/// base-name-only; the ambiguity is documented in tests rather than
/// resolved here.
pub fn parse_include_token(line: &str) -> Option<String> {
    let rest = line.trim_start().strip_prefix("#include")?;
    let open = rest.find(['"', '<'])?;
    let body = &rest[open + 1..];
    let end = body.find(['/', '\\', '"', '>']).unwrap_or(body.len());
    let token = &body[..end];
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// A tracked project header and its include sets
#[derive(Debug, Clone)]
pub struct HeaderNode {
    /// Header base-name
    pub name: String,
    /// Path the header was found at
    pub path: PathBuf,
    /// Directly written include tokens, in file order
    pub primary: Vec<String>,
    /// Headers reachable only transitively through a primary include
    pub secondary: HashSet<String>,
}

/// Directed graph of header includes, keyed by base-name
#[derive(Debug, Default)]
pub struct IncludeGraph {
    nodes: HashMap<String, HeaderNode>,
}

impl IncludeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header with its parsed primary includes
    pub fn add_header(&mut self, name: impl Into<String>, path: PathBuf, primary: Vec<String>) {
        let name = name.into();
        self.nodes.insert(
            name.clone(),
            HeaderNode {
                name,
                path,
                primary,
                secondary: HashSet::new(),
            },
        );
    }

    /// Look up a header by base-name
    pub fn node(&self, name: &str) -> Option<&HeaderNode> {
        self.nodes.get(name)
    }

    /// Populate every header's secondary set. A header re-encountered on
    /// the current expansion chain is a fatal recursive-include error.
    pub fn resolve_secondary(&mut self) -> AuditResult<()> {
        let mut reach: HashMap<String, HashSet<String>> = HashMap::new();
        let mut names: Vec<String> = self.nodes.keys().cloned().collect();
        names.sort();

        for name in &names {
            self.expand(name, &mut reach)?;
        }

        for name in &names {
            let mut secondary = HashSet::new();
            if let Some(node) = self.nodes.get(name) {
                for primary in &node.primary {
                    if let Some(descendants) = reach.get(primary) {
                        secondary.extend(descendants.iter().cloned());
                    }
                }
            }
            if let Some(node) = self.nodes.get_mut(name) {
                node.secondary = secondary;
            }
        }
        Ok(())
    }

    /// Primary includes that are also reachable transitively, per header.
    /// Returns `(header path, include token, token index)` tuples in a
    /// deterministic order: headers sorted by name, includes in file order,
    /// each distinct include reported once.
    pub fn useless_includes(&self) -> Vec<(PathBuf, String, usize)> {
        let mut names: Vec<&String> = self.nodes.keys().collect();
        names.sort();

        let mut found = Vec::new();
        for name in names {
            let node = &self.nodes[name];
            let mut seen = HashSet::new();
            for (idx, primary) in node.primary.iter().enumerate() {
                if !seen.insert(primary.as_str()) {
                    continue;
                }
                if node.secondary.contains(primary) {
                    found.push((node.path.clone(), primary.clone(), idx));
                }
            }
        }
        found
    }

    /// Redundancy check for a source file's include tokens against the
    /// secondary set of its paired header. Each distinct redundant token
    /// is returned once, in the order given.
    pub fn redundant_against(&self, header_name: &str, tokens: &[String]) -> Vec<String> {
        let Some(node) = self.nodes.get(header_name) else {
            return Vec::new();
        };
        let mut seen = HashSet::new();
        tokens
            .iter()
            .filter(|t| seen.insert(t.as_str()) && node.secondary.contains(t.as_str()))
            .cloned()
            .collect()
    }

    /// Compute the descendant set of `start` (memoized into `reach`),
    /// using an explicit stack of `(name, next-child)` frames.
    fn expand(&self, start: &str, reach: &mut HashMap<String, HashSet<String>>) -> AuditResult<()> {
        if reach.contains_key(start) || !self.nodes.contains_key(start) {
            return Ok(());
        }

        let mut stack: Vec<(String, usize)> = vec![(start.to_string(), 0)];
        let mut chain: HashSet<String> = HashSet::new();
        chain.insert(start.to_string());

        while !stack.is_empty() {
            let top = stack.len() - 1;
            let name = stack[top].0.clone();
            let Some(node) = self.nodes.get(&name) else {
                stack.pop();
                continue;
            };

            let idx = stack[top].1;
            if idx < node.primary.len() {
                stack[top].1 += 1;
                let child = node.primary[idx].clone();

                if chain.contains(&child) {
                    let mut names: Vec<&str> = stack.iter().map(|(n, _)| n.as_str()).collect();
                    if let Some(pos) = names.iter().position(|n| *n == child) {
                        names.drain(..pos);
                    }
                    return Err(AuditError::IncludeCycle {
                        chain: format!("{} -> {}", names.join(" -> "), child),
                    });
                }
                if reach.contains_key(&child) {
                    continue;
                }
                if self.nodes.contains_key(&child) {
                    chain.insert(child.clone());
                    stack.push((child, 0));
                } else {
                    // Untracked includes (system headers) have no children
                    // we can see.
                    reach.insert(child, HashSet::new());
                }
            } else {
                let mut descendants = HashSet::new();
                for primary in &node.primary {
                    descendants.insert(primary.clone());
                    if let Some(r) = reach.get(primary) {
                        descendants.extend(r.iter().cloned());
                    }
                }
                chain.remove(&name);
                reach.insert(name, descendants);
                stack.pop();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(graph: &mut IncludeGraph, name: &str, primary: &[&str]) {
        graph.add_header(
            name,
            PathBuf::from(format!("src/{}", name)),
            primary.iter().map(|s| s.to_string()).collect(),
        );
    }

    #[test]
    fn test_parse_quoted_include() {
        assert_eq!(
            parse_include_token("#include \"util.h\""),
            Some("util.h".to_string())
        );
    }

    #[test]
    fn test_parse_angle_include() {
        assert_eq!(
            parse_include_token("#include <stdio.h>"),
            Some("stdio.h".to_string())
        );
    }

    #[test]
    fn test_parse_keeps_first_path_segment_only() {
        // Multi-segment includes lose everything after the first separator.
        // This matches by base-name only and is deliberately ambiguous for
        // relative includes; the behavior is pinned here, not fixed.
        assert_eq!(
            parse_include_token("#include \"sub/dir/header.h\""),
            Some("sub".to_string())
        );
    }

    #[test]
    fn test_parse_ignores_non_include_lines() {
        assert_eq!(parse_include_token("int x = 0;"), None);
        assert_eq!(parse_include_token("#define X 1"), None);
    }

    #[test]
    fn test_secondary_is_strictly_transitive() {
        let mut graph = IncludeGraph::new();
        header(&mut graph, "a.h", &["b.h"]);
        header(&mut graph, "b.h", &["c.h"]);
        header(&mut graph, "c.h", &[]);
        graph.resolve_secondary().unwrap();

        let a = graph.node("a.h").unwrap();
        assert!(a.secondary.contains("c.h"));
        assert!(!a.secondary.contains("b.h"), "direct include is primary only");
    }

    #[test]
    fn test_cycle_is_fatal() {
        let mut graph = IncludeGraph::new();
        header(&mut graph, "h1.h", &["h2.h"]);
        header(&mut graph, "h2.h", &["h1.h"]);

        let result = graph.resolve_secondary();
        match result {
            Err(AuditError::IncludeCycle { chain }) => {
                assert!(chain.contains("h1.h"));
                assert!(chain.contains("h2.h"));
            }
            other => panic!("Expected IncludeCycle, got {:?}", other),
        }
    }

    #[test]
    fn test_self_include_is_fatal() {
        let mut graph = IncludeGraph::new();
        header(&mut graph, "h.h", &["h.h"]);
        assert!(matches!(
            graph.resolve_secondary(),
            Err(AuditError::IncludeCycle { .. })
        ));
    }

    #[test]
    fn test_useless_include_reported_once_regardless_of_order() {
        // x.h is both direct and reachable through mid.h. One report,
        // whichever order the includes are listed in.
        for primaries in [["x.h", "mid.h"], ["mid.h", "x.h"]] {
            let mut graph = IncludeGraph::new();
            header(&mut graph, "top.h", &primaries);
            header(&mut graph, "mid.h", &["x.h"]);
            header(&mut graph, "x.h", &[]);
            graph.resolve_secondary().unwrap();

            let useless = graph.useless_includes();
            assert_eq!(useless.len(), 1);
            assert_eq!(useless[0].1, "x.h");
        }
    }

    #[test]
    fn test_untracked_system_header_can_be_useless() {
        let mut graph = IncludeGraph::new();
        header(&mut graph, "top.h", &["stdio.h", "io.h"]);
        header(&mut graph, "io.h", &["stdio.h"]);
        graph.resolve_secondary().unwrap();

        let useless = graph.useless_includes();
        assert_eq!(useless.len(), 1);
        assert_eq!(useless[0].1, "stdio.h");
    }

    #[test]
    fn test_source_redundancy_against_paired_header() {
        let mut graph = IncludeGraph::new();
        header(&mut graph, "util.h", &["core.h"]);
        header(&mut graph, "core.h", &["base.h"]);
        header(&mut graph, "base.h", &[]);
        graph.resolve_secondary().unwrap();

        let tokens = vec!["base.h".to_string(), "extra.h".to_string()];
        let redundant = graph.redundant_against("util.h", &tokens);
        assert_eq!(redundant, vec!["base.h".to_string()]);
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        let mut graph = IncludeGraph::new();
        header(&mut graph, "top.h", &["left.h", "right.h"]);
        header(&mut graph, "left.h", &["base.h"]);
        header(&mut graph, "right.h", &["base.h"]);
        header(&mut graph, "base.h", &[]);

        graph.resolve_secondary().unwrap();
        let top = graph.node("top.h").unwrap();
        assert!(top.secondary.contains("base.h"));
        assert!(graph.useless_includes().is_empty());
    }
}
