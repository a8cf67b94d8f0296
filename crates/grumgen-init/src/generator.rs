//! Writing the generated `grumphp.yml`.
//!
//! An existing file is never replaced without confirmation. The check runs
//! before any task question is asked, so a declined overwrite leaves both the
//! file and the project untouched. The old file is only removed by
//! [`DocumentWriter::persist`], right before the new one is written.

use std::fs;
use std::path::Path;

use grumgen_core::{GrumgenError, Result};
use tracing::{debug, info};

use crate::document::ConfigDocument;
use crate::prompt::Prompter;

/// Persists a [`ConfigDocument`] to disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentWriter {
    force: bool,
}

impl DocumentWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite existing files without asking.
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Make sure `path` may be written.
    ///
    /// Asks the operator when the file already exists; a refusal is a
    /// [`GrumgenError::UserAbort`]. Nothing is touched on disk.
    pub fn ensure_writable(&self, path: &Path, prompter: &mut dyn Prompter) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        if path.is_dir() {
            return Err(GrumgenError::invalid_input(format!(
                "{} is a directory",
                path.display()
            )));
        }
        if self.force {
            info!(path = %path.display(), "overwriting existing configuration (forced)");
        } else {
            let question = format!("{} already exists. Overwrite it?", path.display());
            if !prompter.ask_bool(&question, false)? {
                return Err(GrumgenError::user_abort(format!(
                    "kept existing {}",
                    path.display()
                )));
            }
            debug!(path = %path.display(), "overwrite confirmed");
        }
        Ok(())
    }

    /// Serialize and write `document`, creating parent directories.
    ///
    /// An existing file at `path` is deleted first; callers confirm that with
    /// [`ensure_writable`](Self::ensure_writable) beforehand.
    pub fn persist(&self, path: &Path, document: &ConfigDocument) -> Result<()> {
        let yaml = document.to_yaml()?;
        if let Some(parent) = path.parent() {
            create_directory_structure(parent)?;
        }
        if path.is_file() {
            fs::remove_file(path)
                .map_err(|e| GrumgenError::persistence("removing config", path, e))?;
            debug!(path = %path.display(), "removed previous configuration");
        }
        fs::write(path, yaml).map_err(|e| GrumgenError::persistence("writing config", path, e))?;
        info!(
            path = %path.display(),
            tasks = document.grumphp.tasks.len(),
            "configuration written"
        );
        Ok(())
    }
}

/// Create `dir` and its parents if missing.
pub fn create_directory_structure(dir: &Path) -> Result<()> {
    if dir.as_os_str().is_empty() || dir.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|e| GrumgenError::directory_creation(dir, e))?;
    debug!(path = %dir.display(), "created directory");
    Ok(())
}
