//! Composer dev-dependency installation.
//!
//! Packages are processed one at a time in the given order. A failing package
//! is recorded and the batch moves on; the requested list is persisted to the
//! settings store whatever the individual outcomes.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use grumgen_config::SettingsStore;
use grumgen_core::{GrumgenError, PackageId, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, instrument, warn};

use crate::process::{CommandRunner, CommandSpec, ProcessResult};
use crate::types::{InstallReport, PackageOutcome, PackageState};

/// Drives `composer show/require/remove` for a project.
pub struct PackageInstaller {
    runner: Arc<dyn CommandRunner>,
    composer: PathBuf,
    working_dir: PathBuf,
    timeout: Duration,
    store: SettingsStore,
    show_progress: bool,
}

impl std::fmt::Debug for PackageInstaller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackageInstaller")
            .field("composer", &self.composer)
            .field("working_dir", &self.working_dir)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl PackageInstaller {
    /// Create an installer for `project_root`.
    ///
    /// The project root is canonicalized here; failing to resolve it is the
    /// one fatal installer error.
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        composer: impl Into<PathBuf>,
        project_root: &Path,
        timeout: Duration,
        store: SettingsStore,
    ) -> Result<Self> {
        let working_dir =
            project_root
                .canonicalize()
                .map_err(|source| GrumgenError::WorkingDirectory {
                    path: project_root.to_path_buf(),
                    source,
                })?;

        Ok(Self {
            runner,
            composer: composer.into(),
            working_dir,
            timeout,
            store,
            show_progress: true,
        })
    }

    /// Enable or disable the progress bar.
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    fn composer(&self, subcommand: &str, package: &str, dev: bool) -> CommandSpec {
        let mut spec = CommandSpec::new(&self.composer, self.timeout)
            .arg(subcommand)
            .arg(package);
        if dev {
            spec = spec.arg("--dev");
        }
        spec.arg(format!("--working-dir={}", self.working_dir.display()))
            .arg("--no-interaction")
            .current_dir(&self.working_dir)
    }

    fn progress(&self, len: usize, verb: &str) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(len as u64);
        bar.set_style(
            ProgressStyle::with_template("{prefix:>10.cyan.bold} [{bar:30.green/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        bar.set_prefix(verb.to_string());
        bar
    }

    async fn run_isolated(&self, spec: &CommandSpec) -> ProcessResult {
        match self.runner.run(spec).await {
            Ok(result) => result,
            Err(e) => {
                warn!(command = %spec.display(), error = %e, "command could not start");
                ProcessResult::failed(-1, e.to_string())
            }
        }
    }

    async fn is_installed(&self, package: &str) -> bool {
        let result = self.run_isolated(&self.composer("show", package, false)).await;
        result.is_success()
    }

    /// Install every package not already present.
    #[instrument(level = "info", skip_all, fields(count = packages.len()))]
    pub async fn install(&self, packages: &[PackageId]) -> Result<InstallReport> {
        let bar = self.progress(packages.len(), "Installing");
        let mut outcomes = Vec::with_capacity(packages.len());

        for package in packages {
            bar.set_message(package.clone());
            let mut state = PackageState::Pending;
            advance(package, &mut state, PackageState::Checking);

            let outcome = if self.is_installed(package).await {
                advance(package, &mut state, PackageState::AlreadyInstalled);
                warn!(package = %package, "already installed, skipping");
                PackageOutcome::new(package, state)
            } else {
                advance(package, &mut state, PackageState::Installing);
                let result = self.run_isolated(&self.composer("require", package, true)).await;
                if result.is_success() {
                    advance(package, &mut state, PackageState::Installed);
                    info!(package = %package, "installed");
                    PackageOutcome::new(package, state)
                } else {
                    advance(package, &mut state, PackageState::Failed);
                    let summary = result.failure_summary();
                    warn!(package = %package, reason = %summary, "install failed");
                    PackageOutcome::failed(package, summary)
                }
            };

            outcomes.push(outcome);
            bar.inc(1);
        }
        bar.finish_and_clear();

        self.store.record_packages(packages)?;

        let report = InstallReport::new(outcomes);
        info!(status = ?report.status, "package installation finished");
        Ok(report)
    }

    /// Remove every installed package, then clear the persisted selection.
    #[instrument(level = "info", skip_all, fields(count = packages.len()))]
    pub async fn remove(&self, packages: &[PackageId]) -> Result<InstallReport> {
        let bar = self.progress(packages.len(), "Removing");
        let mut outcomes = Vec::with_capacity(packages.len());

        for package in packages {
            bar.set_message(package.clone());
            let mut state = PackageState::Pending;
            advance(package, &mut state, PackageState::Checking);

            let outcome = if !self.is_installed(package).await {
                advance(package, &mut state, PackageState::NotInstalled);
                debug!(package = %package, "not installed, nothing to remove");
                PackageOutcome::new(package, state)
            } else {
                advance(package, &mut state, PackageState::Removing);
                let result = self.run_isolated(&self.composer("remove", package, true)).await;
                if result.is_success() {
                    advance(package, &mut state, PackageState::Removed);
                    info!(package = %package, "removed");
                    PackageOutcome::new(package, state)
                } else {
                    advance(package, &mut state, PackageState::Failed);
                    let summary = result.failure_summary();
                    warn!(package = %package, reason = %summary, "removal failed");
                    PackageOutcome::failed(package, summary)
                }
            };

            outcomes.push(outcome);
            bar.inc(1);
        }
        bar.finish_and_clear();

        self.store.record_packages(&[])?;

        let report = InstallReport::new(outcomes);
        info!(status = ?report.status, "package removal finished");
        Ok(report)
    }
}

fn advance(package: &str, state: &mut PackageState, next: PackageState) {
    debug_assert!(state.can_transition_to(next), "{state} -> {next}");
    debug!(package, from = %state, to = %next, "package state");
    *state = next;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InstallStatus;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct FakeComposer {
        installed: HashSet<String>,
        failing: HashSet<String>,
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl FakeComposer {
        fn with(installed: &[&str], failing: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                installed: installed.iter().map(|s| s.to_string()).collect(),
                failing: failing.iter().map(|s| s.to_string()).collect(),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self, subcommand: &str) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|args| args[0] == subcommand)
                .map(|args| args[1].clone())
                .collect()
        }
    }

    #[async_trait]
    impl CommandRunner for FakeComposer {
        async fn run(&self, spec: &CommandSpec) -> Result<ProcessResult> {
            self.calls.lock().unwrap().push(spec.args.clone());
            let package = spec.args[1].as_str();
            Ok(match spec.args[0].as_str() {
                "show" if self.installed.contains(package) => ProcessResult::success(package),
                "show" => ProcessResult::failed(1, "package not found"),
                _ if self.failing.contains(package) => ProcessResult::failed(2, "resolution failed"),
                _ => ProcessResult::success(""),
            })
        }
    }

    fn installer(runner: Arc<FakeComposer>, temp: &TempDir) -> PackageInstaller {
        PackageInstaller::new(
            runner,
            "composer",
            temp.path(),
            Duration::from_secs(300),
            SettingsStore::for_project(temp.path()),
        )
        .unwrap()
        .with_progress(false)
    }

    fn ids(names: &[&str]) -> Vec<PackageId> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_installed_package_is_skipped_and_both_persisted() {
        let temp = TempDir::new().unwrap();
        let runner = FakeComposer::with(&["a/a"], &["b/b"]);
        let installer = installer(runner.clone(), &temp);

        let report = installer.install(&ids(&["a/a", "b/b"])).await.unwrap();

        assert_eq!(runner.calls("require"), vec!["b/b"]);
        assert_eq!(report.outcomes[0].state, PackageState::AlreadyInstalled);
        assert_eq!(report.outcomes[1].state, PackageState::Failed);
        assert_eq!(
            SettingsStore::for_project(temp.path()).packages().unwrap(),
            ids(&["a/a", "b/b"])
        );
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_the_batch() {
        let temp = TempDir::new().unwrap();
        let runner = FakeComposer::with(&[], &["b/b"]);
        let installer = installer(runner.clone(), &temp);

        let report = installer.install(&ids(&["a/a", "b/b", "c/c"])).await.unwrap();

        assert_eq!(runner.calls("require"), vec!["a/a", "b/b", "c/c"]);
        assert_eq!(report.status, InstallStatus::PartialFailure);
        assert_eq!(report.outcomes[2].state, PackageState::Installed);
        assert!(report.outcomes[1].message.as_deref().unwrap().contains("exit code 2"));
    }

    #[tokio::test]
    async fn test_require_arguments() {
        let temp = TempDir::new().unwrap();
        let runner = FakeComposer::with(&[], &[]);
        let installer = installer(runner.clone(), &temp);

        installer.install(&ids(&["phpro/grumphp"])).await.unwrap();

        let calls = runner.calls.lock().unwrap().clone();
        let working_dir = format!("--working-dir={}", installer.working_dir().display());
        assert_eq!(
            calls,
            vec![
                vec!["show".to_string(), "phpro/grumphp".into(), working_dir.clone(), "--no-interaction".into()],
                vec!["require".to_string(), "phpro/grumphp".into(), "--dev".into(), working_dir, "--no-interaction".into()],
            ]
        );
    }

    #[tokio::test]
    async fn test_remove_only_touches_installed_packages() {
        let temp = TempDir::new().unwrap();
        let store = SettingsStore::for_project(temp.path());
        store.record_packages(&ids(&["a/a", "b/b"])).unwrap();

        let runner = FakeComposer::with(&["a/a"], &[]);
        let installer = installer(runner.clone(), &temp);
        let report = installer.remove(&ids(&["a/a", "b/b"])).await.unwrap();

        assert_eq!(runner.calls("remove"), vec!["a/a"]);
        assert_eq!(report.count(PackageState::Removed), 1);
        assert_eq!(report.count(PackageState::NotInstalled), 1);
        assert!(store.packages().unwrap().is_empty());
    }

    #[test]
    fn test_unresolvable_working_dir_is_fatal() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing");
        let err = PackageInstaller::new(
            FakeComposer::with(&[], &[]),
            "composer",
            &missing,
            Duration::from_secs(1),
            SettingsStore::for_project(temp.path()),
        )
        .unwrap_err();
        assert!(matches!(err, GrumgenError::WorkingDirectory { .. }));
    }
}
