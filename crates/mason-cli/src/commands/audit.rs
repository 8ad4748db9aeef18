//! Audit command - include-graph and style report for the project sources

use anyhow::{Context, Result};
use colored::Colorize;
use mason_audit::{AuditReport, Auditor, Severity, Tier};
use std::path::PathBuf;

/// Audit command arguments
#[derive(Default)]
pub struct AuditArgs {
    /// Workspace root (defaults to the current directory)
    pub dir: Option<PathBuf>,
    /// JSON output
    pub json: bool,
}

/// Run the audit command. Findings never fail the command; only an
/// unreadable project or an include cycle does.
pub fn run(args: AuditArgs) -> Result<()> {
    let root = args.dir.clone().unwrap_or_else(|| PathBuf::from("."));
    let loaded = mason_config::load_from_dir(&root)
        .context("Failed to load project configuration")?;

    let project_root = root.join(&loaded.config.project_dir);
    let report = Auditor::new(&project_root).run().context("Audit failed")?;

    if args.json {
        print_json(&report);
    } else {
        print_human(&report);
    }

    Ok(())
}

fn print_json(report: &AuditReport) {
    let violations: Vec<_> = report
        .violations()
        .iter()
        .map(|v| {
            serde_json::json!({
                "file": v.file,
                "line": v.line,
                "kind": v.kind.describe(),
                "severity": severity_name(v.kind.severity()),
                "detail": v.detail,
            })
        })
        .collect();

    println!(
        "{}",
        serde_json::json!({
            "violations": violations,
            "total": report.total(),
            "major": report.count_of(Severity::Major),
            "minor": report.count_of(Severity::Minor),
            "tier": tier_name(report.tier()),
        })
    );
}

fn print_human(report: &AuditReport) {
    for violation in report.violations() {
        let tag = match violation.kind.severity() {
            Severity::Major => "major".red().bold(),
            Severity::Minor => "minor".yellow().bold(),
        };
        println!("{} {}", tag, violation);
    }

    if report.total() > 0 {
        println!();
    }
    let tier = match report.tier() {
        Tier::Clean => "clean".green().bold(),
        Tier::Low => "low".yellow().bold(),
        Tier::High => "high".red().bold(),
    };
    println!("{} violation(s), tier: {}", report.total(), tier);
}

fn severity_name(severity: Severity) -> &'static str {
    match severity {
        Severity::Major => "major",
        Severity::Minor => "minor",
    }
}

fn tier_name(tier: Tier) -> &'static str {
    match tier {
        Tier::Clean => "clean",
        Tier::Low => "low",
        Tier::High => "high",
    }
}
