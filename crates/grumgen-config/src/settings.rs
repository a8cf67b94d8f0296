//! Structured configuration store.
//!
//! Holds process timeouts, output locations and the persisted package
//! selection in `<project>/.grumgen/settings.yaml`.

use std::path::{Path, PathBuf};

use grumgen_core::{PackageId, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::store;

/// Directory under the project root holding grumgen's own files.
pub const STATE_DIR: &str = ".grumgen";

/// Default timeout for package install/removal commands, in seconds.
pub const DEFAULT_PROCESS_TIMEOUT_SECS: u64 = 300;

/// Default timeout for a GrumPHP run, in seconds.
pub const DEFAULT_LINT_TIMEOUT_SECS: u64 = 300;

/// Persisted grumgen settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Timeout for each `composer require/remove/show` invocation
    pub process_timeout: u64,

    /// Timeout for `grumphp run`
    pub lint_timeout: u64,

    /// Generated GrumPHP config location, relative to the project root
    pub config_path: PathBuf,

    /// Where check results are saved, relative to the project root
    pub results_dir: PathBuf,

    /// Packages requested by the last generate run (desired state)
    pub packages: Vec<PackageId>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            process_timeout: DEFAULT_PROCESS_TIMEOUT_SECS,
            lint_timeout: DEFAULT_LINT_TIMEOUT_SECS,
            config_path: PathBuf::from("grumphp.yml"),
            results_dir: PathBuf::from(STATE_DIR).join("results"),
            packages: Vec::new(),
        }
    }
}

impl Settings {
    /// Absolute location of the generated config for `project_root`.
    pub fn config_path_in(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.config_path)
    }

    /// Absolute location of the results directory for `project_root`.
    pub fn results_dir_in(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.results_dir)
    }
}

/// File-backed store for [`Settings`].
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Store at an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<project_root>/.grumgen/settings.yaml`.
    pub fn for_project(project_root: &Path) -> Self {
        Self::new(project_root.join(STATE_DIR).join("settings.yaml"))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings; a missing file yields defaults.
    pub fn load(&self) -> Result<Settings> {
        store::read_or_default(&self.path)
    }

    /// Persist settings.
    pub fn save(&self, settings: &Settings) -> Result<()> {
        store::write(&self.path, settings)
    }

    /// Persist the requested package selection, keeping other settings.
    pub fn record_packages(&self, packages: &[PackageId]) -> Result<()> {
        let mut settings = self.load()?;
        settings.packages = packages.to_vec();
        self.save(&settings)?;
        info!(count = packages.len(), "package selection recorded");
        Ok(())
    }

    /// Read the persisted package selection.
    pub fn packages(&self) -> Result<Vec<PackageId>> {
        Ok(self.load()?.packages)
    }
}
