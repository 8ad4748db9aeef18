//! Build command - incremental compile and link via the snapshot cache

use anyhow::{Context, Result};
use colored::Colorize;
use mason_build::{BuildMode, Builder};
use std::path::PathBuf;

/// Build command arguments
#[derive(Default)]
pub struct BuildArgs {
    /// Workspace root (defaults to the current directory)
    pub dir: Option<PathBuf>,
    /// Production build
    pub prod: bool,
    /// Verbose output
    pub verbose: bool,
    /// Quiet output (errors only)
    pub quiet: bool,
    /// JSON output
    pub json: bool,
}

/// Run the build command
pub fn run(args: BuildArgs) -> Result<()> {
    let root = args.dir.clone().unwrap_or_else(|| PathBuf::from("."));
    let mode = if args.prod {
        BuildMode::Prod
    } else {
        BuildMode::Debug
    };

    let builder = Builder::new(&root)
        .context("Failed to load project configuration")?
        .with_mode(mode)
        .with_verbose(args.verbose && !args.quiet);

    if !args.quiet && !args.json {
        for warning in builder.warnings() {
            eprintln!("{} {}", "warning:".yellow().bold(), warning);
        }
    }

    let toolchain = builder.default_toolchain();
    let context = builder.build(&toolchain).context("Build failed")?;

    if args.json {
        let stats = &context.stats;
        println!(
            "{}",
            serde_json::json!({
                "success": true,
                "mode": if args.prod { "prod" } else { "debug" },
                "executable": context.executable,
                "changed_headers": stats.changed_headers,
                "total_units": stats.total_units,
                "compiled_units": stats.compiled_units,
                "vendors_compiled": stats.vendors_compiled,
                "linked": stats.linked,
                "dependency_time": stats.dependency_time.as_secs_f64(),
                "compilation_time": stats.compilation_time.as_secs_f64(),
                "linking_time": stats.linking_time.as_secs_f64(),
                "total_time": stats.total_time.as_secs_f64(),
            })
        );
    } else if !args.quiet {
        let stats = &context.stats;
        if stats.compiled_units == 0 && !stats.linked {
            println!(
                "{} nothing to do ({:.2}s)",
                "Up to date:".green().bold(),
                stats.total_time.as_secs_f64()
            );
        } else {
            println!(
                "{} {} in {:.2}s",
                "Built".green().bold(),
                context.executable.display(),
                stats.total_time.as_secs_f64()
            );
            println!(
                "  {}/{} unit(s) compiled, {} changed header(s){}",
                stats.compiled_units,
                stats.total_units,
                stats.changed_headers,
                if stats.vendors_compiled {
                    ", vendors rebuilt"
                } else {
                    ""
                }
            );
            if args.verbose {
                println!(
                    "  deps {:.3}s, compile {:.3}s, link {:.3}s",
                    stats.dependency_time.as_secs_f64(),
                    stats.compilation_time.as_secs_f64(),
                    stats.linking_time.as_secs_f64()
                );
            }
        }
    }

    Ok(())
}
