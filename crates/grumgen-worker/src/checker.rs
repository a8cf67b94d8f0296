//! Running GrumPHP and saving its report.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use grumgen_core::types::parse_name_list;
use grumgen_core::{GrumgenError, Result};
use tracing::{info, instrument, warn};
use url::Url;

use crate::process::{CommandRunner, CommandSpec, ProcessStatus};
use crate::types::CheckOutcome;

/// Arguments for `grumphp run`, one `--tasks=` per name in `filter`.
pub fn grumphp_args(filter: Option<&str>) -> Vec<String> {
    let mut args = vec!["run".to_string(), "--no-interaction".to_string()];
    if let Some(filter) = filter {
        args.extend(
            parse_name_list(filter)
                .into_iter()
                .map(|task| format!("--tasks={task}")),
        );
    }
    args
}

/// `result_<YYYY-MM-DD_HH-MM-SS>.txt` for `at`.
pub fn result_file_name(at: DateTime<Local>) -> String {
    format!("result_{}.txt", at.format("%Y-%m-%d_%H-%M-%S"))
}

/// Name for the `attempt`-th file written within the same second.
fn numbered_result_file_name(at: DateTime<Local>, attempt: u32) -> String {
    if attempt == 0 {
        result_file_name(at)
    } else {
        format!("result_{}_{attempt}.txt", at.format("%Y-%m-%d_%H-%M-%S"))
    }
}

/// Same-second runs before giving up on a free file name.
const MAX_NAME_ATTEMPTS: u32 = 100;

/// Runs a located GrumPHP binary against a project.
pub struct Checker {
    runner: Arc<dyn CommandRunner>,
    grumphp: PathBuf,
    project_root: PathBuf,
    results_dir: PathBuf,
    timeout: Duration,
}

impl std::fmt::Debug for Checker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Checker")
            .field("grumphp", &self.grumphp)
            .field("project_root", &self.project_root)
            .field("results_dir", &self.results_dir)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Checker {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        grumphp: impl Into<PathBuf>,
        project_root: impl Into<PathBuf>,
        results_dir: impl Into<PathBuf>,
        timeout: Duration,
    ) -> Self {
        Self {
            runner,
            grumphp: grumphp.into(),
            project_root: project_root.into(),
            results_dir: results_dir.into(),
            timeout,
        }
    }

    /// Run GrumPHP, optionally restricted to the comma-separated `tasks_filter`.
    ///
    /// A failing or timed-out run is reported through the outcome; the result
    /// file is written either way.
    #[instrument(level = "info", skip(self))]
    pub async fn run(&self, tasks_filter: Option<&str>) -> Result<CheckOutcome> {
        let spec = CommandSpec::new(&self.grumphp, self.timeout)
            .args(grumphp_args(tasks_filter))
            .current_dir(&self.project_root);
        info!(command = %spec.display(), "running grumphp");

        let result = self.runner.run(&spec).await?;

        let mut report = result.combined_output();
        if result.status == ProcessStatus::TimedOut {
            warn!(timeout_secs = self.timeout.as_secs(), "grumphp timed out");
            report.push_str(&format!(
                "\ngrumphp timed out after {}s\n",
                self.timeout.as_secs()
            ));
        }

        let result_file = self.save(&report, Local::now())?;
        let result_url = Url::from_file_path(&result_file)
            .map_err(|()| {
                GrumgenError::internal(format!(
                    "cannot build a file URL for {}",
                    result_file.display()
                ))
            })?
            .to_string();

        let outcome = CheckOutcome {
            passed: result.is_success(),
            exit_code: result.exit_code,
            timed_out: result.status == ProcessStatus::TimedOut,
            result_file,
            result_url,
        };
        if outcome.passed {
            info!(url = %outcome.result_url, "grumphp passed");
        } else {
            warn!(exit_code = ?outcome.exit_code, url = %outcome.result_url, "grumphp reported failures");
        }
        Ok(outcome)
    }

    /// Write `report` to a new timestamped file and return its canonical path.
    ///
    /// Earlier results are never overwritten: a name already taken within the
    /// same second gets a numeric suffix.
    fn save(&self, report: &str, at: DateTime<Local>) -> Result<PathBuf> {
        fs::create_dir_all(&self.results_dir)
            .map_err(|e| GrumgenError::directory_creation(&self.results_dir, e))?;

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let path = self.results_dir.join(numbered_result_file_name(at, attempt));
            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => file,
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(GrumgenError::persistence("saving results", &path, e)),
            };
            file.write_all(report.as_bytes())
                .map_err(|e| GrumgenError::persistence("saving results", &path, e))?;
            return canonical(&path);
        }

        let path = self.results_dir.join(result_file_name(at));
        Err(GrumgenError::persistence(
            "saving results",
            &path,
            io::Error::new(io::ErrorKind::AlreadyExists, "no free result file name"),
        ))
    }
}

fn canonical(path: &Path) -> Result<PathBuf> {
    path.canonicalize()
        .map_err(|e| GrumgenError::persistence("resolving results path", path, e))
}
