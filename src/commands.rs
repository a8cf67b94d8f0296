//! Command flows behind the CLI subcommands.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use console::style;
use grumgen_config::{INSTALL_PACKAGES_KEY, SettingsStore, StateStore};
use grumgen_core::types::parse_name_list;
use grumgen_core::{GrumgenError, Result, TaskId};
use grumgen_init::detection::{locate_composer, locate_grumphp};
use grumgen_init::{
    ConfigAssembler, DefaultsPrompter, DocumentWriter, InquirePrompter, Prompter, validate_config,
};
use grumgen_worker::{
    Checker, CommandRunner, InstallReport, PackageInstaller, PackageState, TokioRunner,
};
use serde::Serialize;
use tracing::{info, warn};

/// Options shared by both generate commands.
#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Comma-separated task ids or aliases; skips the selection prompt
    #[arg(long)]
    pub tasks: Option<String>,

    /// Where to write the configuration (defaults to the configured path)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Timeout in seconds for each Composer invocation
    #[arg(long)]
    pub timeout: Option<u64>,
}

/// Process-wide inputs of every command.
#[derive(Clone)]
pub struct Context {
    pub project_root: PathBuf,
    pub defaults: bool,
    pub force: bool,
    runner: Arc<dyn CommandRunner>,
    composer_lookup: fn() -> Result<PathBuf>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("project_root", &self.project_root)
            .field("defaults", &self.defaults)
            .field("force", &self.force)
            .finish_non_exhaustive()
    }
}

impl Context {
    pub fn new(project_root: Option<PathBuf>, defaults: bool, force: bool) -> Result<Self> {
        let project_root = match project_root {
            Some(root) => root,
            None => std::env::current_dir().map_err(|source| GrumgenError::WorkingDirectory {
                path: PathBuf::from("."),
                source,
            })?,
        };
        Ok(Self {
            project_root,
            defaults,
            force,
            runner: Arc::new(TokioRunner::new()),
            composer_lookup: locate_composer,
        })
    }

    /// Run child processes through `runner` instead of spawning them.
    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Resolve Composer with `lookup` instead of searching `PATH`.
    pub fn with_composer_lookup(mut self, lookup: fn() -> Result<PathBuf>) -> Self {
        self.composer_lookup = lookup;
        self
    }

    /// Prompter matching `--defaults`.
    pub fn prompter(&self) -> Box<dyn Prompter> {
        if self.defaults {
            Box::new(DefaultsPrompter::new())
        } else {
            Box::new(InquirePrompter::new())
        }
    }

    fn settings_store(&self) -> SettingsStore {
        SettingsStore::for_project(&self.project_root)
    }

    fn installer(
        &self,
        composer: PathBuf,
        timeout: u64,
        store: SettingsStore,
    ) -> Result<PackageInstaller> {
        PackageInstaller::new(
            self.runner.clone(),
            composer,
            &self.project_root,
            Duration::from_secs(timeout),
            store,
        )
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }
}

/// `generate-install` / `generate-no-install`.
///
/// Everything that can fail runs before the existing configuration is
/// replaced: Composer is located before the overwrite question, and the old
/// file is only removed when the new document is written.
pub async fn generate(
    ctx: &Context,
    args: &GenerateArgs,
    install: bool,
    prompter: &mut dyn Prompter,
) -> Result<ExitCode> {
    let store = ctx.settings_store();
    let settings = store.load()?;
    let config_path = match &args.output {
        Some(output) => ctx.resolve(output),
        None => settings.config_path_in(&ctx.project_root),
    };
    info!(path = %config_path.display(), install, "generating configuration");

    let composer = if install {
        Some((ctx.composer_lookup)()?)
    } else {
        None
    };

    let writer = DocumentWriter::new().with_force(ctx.force);
    writer.ensure_writable(&config_path, prompter)?;

    let assembler = ConfigAssembler::builtin();
    let tasks = select(&assembler, args.tasks.as_deref(), prompter)?;
    let document = assembler.assemble(prompter, &tasks)?;

    let mut exit = ExitCode::SUCCESS;
    if let Some(composer) = composer {
        let packages = assembler.package_selection(&tasks);
        let timeout = args.timeout.unwrap_or(settings.process_timeout);
        let report = ctx.installer(composer, timeout, store)?.install(&packages).await?;
        print_report(&report);
        if !report.is_success() {
            exit = ExitCode::from(1);
        }
    }

    writer.persist(&config_path, &document)?;
    StateStore::for_project(&ctx.project_root).set_bool(INSTALL_PACKAGES_KEY, install)?;

    println!(
        "{} Wrote {} with {} task(s): {}",
        style("✓").green().bold(),
        style(config_path.display()).bold(),
        tasks.len(),
        document.task_ids().join(", ")
    );
    Ok(exit)
}

fn select(
    assembler: &ConfigAssembler,
    preselected: Option<&str>,
    prompter: &mut dyn Prompter,
) -> Result<Vec<TaskId>> {
    let Some(list) = preselected else {
        return assembler.select_tasks(prompter);
    };

    let selection = assembler.resolve_selection(parse_name_list(list));
    for name in &selection.unknown {
        eprintln!("{} Unknown task '{}' ignored", style("!").yellow().bold(), name);
    }
    if selection.tasks.is_empty() {
        return Err(GrumgenError::invalid_input(format!(
            "no known task in '{list}'"
        )));
    }
    Ok(selection.tasks)
}

fn print_report(report: &InstallReport) {
    for outcome in &report.outcomes {
        let marker = match outcome.state {
            PackageState::Installed | PackageState::Removed => style("✓").green(),
            PackageState::AlreadyInstalled | PackageState::NotInstalled => style("-").dim(),
            _ => style("✗").red(),
        };
        match &outcome.message {
            Some(message) => println!("  {marker} {} ({}: {message})", outcome.package, outcome.state),
            None => println!("  {marker} {} ({})", outcome.package, outcome.state),
        }
    }
    if !report.is_success() {
        eprintln!(
            "{} {} package(s) failed; the selection was still recorded",
            style("!").yellow().bold(),
            report.failed().count()
        );
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| GrumgenError::internal(format!("serializing output: {e}")))?;
    println!("{json}");
    Ok(())
}

/// `check`.
pub async fn check(ctx: &Context, tasks: Option<&str>, json: bool) -> Result<ExitCode> {
    let settings = ctx.settings_store().load()?;
    let grumphp = locate_grumphp(&ctx.project_root)?;
    let checker = Checker::new(
        ctx.runner.clone(),
        grumphp,
        &ctx.project_root,
        settings.results_dir_in(&ctx.project_root),
        Duration::from_secs(settings.lint_timeout),
    );

    let outcome = checker.run(tasks).await?;

    if json {
        print_json(&outcome)?;
    } else if outcome.passed {
        println!("{} GrumPHP passed", style("✓").green().bold());
        println!("  Results: {}", outcome.result_url);
    } else {
        let reason = if outcome.timed_out {
            "timed out".to_string()
        } else {
            format!("exit code {}", outcome.exit_code.unwrap_or(-1))
        };
        println!("{} GrumPHP failed ({reason})", style("✗").red().bold());
        println!("  Results: {}", outcome.result_url);
    }

    Ok(if outcome.passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

/// `validate`.
pub fn validate(ctx: &Context, json: bool) -> Result<ExitCode> {
    let settings = ctx.settings_store().load()?;
    let assembler = ConfigAssembler::builtin();
    let results = validate_config(&settings.config_path_in(&ctx.project_root), assembler.catalog())?;

    if json {
        print_json(&results)?;
    } else {
        for warning in &results.warnings {
            println!("{} {warning}", style("!").yellow().bold());
        }
        if results.passed {
            println!(
                "{} {} is valid ({} task(s))",
                style("✓").green().bold(),
                results.path.display(),
                results.tasks.len()
            );
        } else {
            println!("{} {} is invalid", style("✗").red().bold(), results.path.display());
        }
    }

    Ok(if results.passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

/// `remove`.
pub async fn remove(ctx: &Context) -> Result<ExitCode> {
    let state = StateStore::for_project(&ctx.project_root);
    if state.get_bool(INSTALL_PACKAGES_KEY)? == Some(false) {
        println!("Packages were not installed by grumgen; nothing to remove");
        return Ok(ExitCode::SUCCESS);
    }

    let store = ctx.settings_store();
    let settings = store.load()?;
    if settings.packages.is_empty() {
        println!("No recorded packages to remove");
        return Ok(ExitCode::SUCCESS);
    }

    let composer = (ctx.composer_lookup)()?;
    let installer = ctx.installer(composer, settings.process_timeout, store)?;
    let report = installer.remove(&settings.packages).await?;
    print_report(&report);
    state.set_bool(INSTALL_PACKAGES_KEY, false)?;

    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        warn!("some packages could not be removed");
        Ok(ExitCode::from(1))
    }
}
