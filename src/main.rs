//! grumgen - GrumPHP configuration generator for Drupal projects
//!
//! Asks which checks to enable, writes `grumphp.yml` and installs the Composer
//! dev-dependencies those checks need.
//!
//! ## Usage
//!
//! ```bash
//! # Generate the config and install packages
//! grumgen ccgi
//!
//! # Generate only, unattended, for two tasks
//! grumgen --defaults ccgni --tasks lint,style-checker
//!
//! # Run GrumPHP for selected tasks
//! grumgen check --tasks=phpcs,phplint
//!
//! # With verbose logging
//! grumgen -v validate
//! ```

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use commands::{Context, GenerateArgs};
use console::style;
use grumgen_core::{GrumgenError, LogGuard, init_logging};
use tracing::{error, info, warn};

/// GrumPHP configuration generator
///
/// Builds a grumphp.yml for a Drupal project from a few questions and
/// installs the matching Composer dev-dependencies.
#[derive(Parser, Debug)]
#[command(name = "grumgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose logging (increases log level)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Directory for log files (defaults to ~/.grumgen/logs/)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Project root holding composer.json (defaults to the current directory)
    #[arg(long, global = true)]
    project_root: Option<PathBuf>,

    /// Answer every question with its default
    #[arg(long, global = true)]
    defaults: bool,

    /// Overwrite an existing configuration without asking
    #[arg(long, global = true)]
    force: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate grumphp.yml and install the required packages
    #[command(visible_alias = "ccgi")]
    GenerateInstall(GenerateArgs),

    /// Generate grumphp.yml without installing packages
    #[command(visible_alias = "ccgni")]
    GenerateNoInstall(GenerateArgs),

    /// Run GrumPHP and save its output
    Check {
        /// Comma-separated tasks to run
        #[arg(long)]
        tasks: Option<String>,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate the existing grumphp.yml
    Validate {
        /// Print the results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove the packages installed by a previous generate run
    Remove,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let _guard = match setup_logging(&cli) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e:#}");
            return ExitCode::from(1);
        }
    };

    info!(command = ?cli.command, "starting grumgen");

    match run(&cli).await {
        Ok(code) => code,
        Err(e) if e.is_user_abort() => {
            warn!(reason = %e, "operation aborted by operator");
            eprintln!("{} {e}", style("!").yellow().bold());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "grumgen failed");
            eprintln!("{} {e}", style("Error:").red().bold());
            if let Some(hint) = e.guidance() {
                eprintln!("  {}", style(hint).dim());
            }
            ExitCode::from(1)
        }
    }
}

/// Set up logging based on CLI arguments.
fn setup_logging(cli: &Cli) -> anyhow::Result<LogGuard> {
    let debug = cli.verbose > 0;
    init_logging(cli.log_dir.clone(), debug).context("setting up log output")
}

async fn run(cli: &Cli) -> Result<ExitCode, GrumgenError> {
    let ctx = Context::new(cli.project_root.clone(), cli.defaults, cli.force)?;

    match &cli.command {
        Command::GenerateInstall(args) => {
            let mut prompter = ctx.prompter();
            commands::generate(&ctx, args, true, prompter.as_mut()).await
        }
        Command::GenerateNoInstall(args) => {
            let mut prompter = ctx.prompter();
            commands::generate(&ctx, args, false, prompter.as_mut()).await
        }
        Command::Check { tasks, json } => commands::check(&ctx, tasks.as_deref(), *json).await,
        Command::Validate { json } => commands::validate(&ctx, *json),
        Command::Remove => commands::remove(&ctx).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_aliases_parse() {
        let cli = Cli::try_parse_from(["grumgen", "ccgi", "--tasks", "lint"]).unwrap();
        assert!(matches!(cli.command, Command::GenerateInstall(ref a) if a.tasks.as_deref() == Some("lint")));

        let cli = Cli::try_parse_from(["grumgen", "--defaults", "ccgni"]).unwrap();
        assert!(cli.defaults);
        assert!(matches!(cli.command, Command::GenerateNoInstall(_)));
    }

    #[test]
    fn test_check_tasks_filter() {
        let cli = Cli::try_parse_from(["grumgen", "check", "--tasks=phpcs,phplint", "--json"]).unwrap();
        match cli.command {
            Command::Check { tasks, json } => {
                assert_eq!(tasks.as_deref(), Some("phpcs,phplint"));
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["grumgen", "validate", "-vv", "--project-root", "/srv/site"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.project_root, Some(PathBuf::from("/srv/site")));
    }
}
