use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

/// Mason incremental C build tool.
///
/// Mason compiles a flat C project with a byte-comparison snapshot cache:
/// only sources that changed, or that include a changed header, are
/// recompiled. The audit command checks the project's include graph and
/// source style without touching the build.
///
/// EXAMPLES:
///     mason build                  Incremental debug build
///     mason build --prod           Optimized production build
///     mason build --verbose        Show per-unit compile decisions
///     mason audit                  Audit includes and style
///     mason audit --json           Machine-readable audit report
///
/// ENVIRONMENT VARIABLES:
///     MASON_JSON   Set to '1' for JSON output by default
///     NO_COLOR     Set to disable colored output
#[derive(Parser)]
#[command(name = "mason")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the project incrementally
    ///
    /// Reads .masonconf from the workspace root (defaults apply when it is
    /// absent), consolidates vendor sources, recompiles every stale unit,
    /// and links build/bin.exe. A second run with no edits does nothing.
    ///
    /// EXAMPLES:
    ///     mason build                  Build with the debug flag set
    ///     mason build --prod           Add -O3 and the production define
    ///     mason build -C path/to/proj  Build another workspace
    #[command(visible_alias = "b")]
    Build {
        /// Workspace root (defaults to the current directory)
        #[arg(long, short = 'C')]
        dir: Option<PathBuf>,
        /// Production build (optimized, defines PROD_BUILD)
        #[arg(long)]
        prod: bool,
        /// Verbose output with per-unit decisions and timing
        #[arg(long, short = 'v')]
        verbose: bool,
        /// Quiet output (errors only)
        #[arg(long, short = 'q')]
        quiet: bool,
        /// Output the build summary as JSON
        #[arg(long, env = "MASON_JSON")]
        json: bool,
    },

    /// Audit the project's include graph and style
    ///
    /// Scans every file under the project directory, reports useless
    /// includes, guard problems, unimplemented prototypes, raw allocator
    /// calls and formatting issues, then prints a severity tier. The audit
    /// never fails the command unless the project itself is unreadable or
    /// contains an include cycle.
    ///
    /// EXAMPLES:
    ///     mason audit                  Human-readable report
    ///     mason audit --json           JSON report for tooling
    #[command(visible_alias = "a")]
    Audit {
        /// Workspace root (defaults to the current directory)
        #[arg(long, short = 'C')]
        dir: Option<PathBuf>,
        /// Output the report as JSON
        #[arg(long, env = "MASON_JSON")]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            dir,
            prod,
            verbose,
            quiet,
            json,
        } => {
            let args = commands::build::BuildArgs {
                dir,
                prod,
                verbose,
                quiet,
                json,
            };
            commands::build::run(args)?;
        }
        Commands::Audit { dir, json } => {
            let args = commands::audit::AuditArgs { dir, json };
            commands::audit::run(args)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_build_prod_flag() {
        let cli = Cli::parse_from(["mason", "build", "--prod"]);
        match cli.command {
            Commands::Build { prod, .. } => assert!(prod),
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_audit_json_flag() {
        let cli = Cli::parse_from(["mason", "audit", "--json"]);
        match cli.command {
            Commands::Audit { json, .. } => assert!(json),
            _ => panic!("Expected Audit command"),
        }
    }

    #[test]
    fn test_cli_build_dir() {
        let cli = Cli::parse_from(["mason", "build", "-C", "proj"]);
        match cli.command {
            Commands::Build { dir, .. } => assert_eq!(dir, Some(PathBuf::from("proj"))),
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_alias_b_for_build() {
        let cli = Cli::parse_from(["mason", "b"]);
        assert!(matches!(cli.command, Commands::Build { .. }));
    }

    #[test]
    fn test_alias_a_for_audit() {
        let cli = Cli::parse_from(["mason", "a"]);
        assert!(matches!(cli.command, Commands::Audit { .. }));
    }
}
