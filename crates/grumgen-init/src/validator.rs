//! Validation of an existing `grumphp.yml`.
//!
//! Checks that the file exists, parses as a configuration document, and only
//! configures tasks grumgen knows about.

use std::fs;
use std::path::{Path, PathBuf};

use grumgen_core::{GrumgenError, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::TaskCatalog;
use crate::document::ConfigDocument;

/// Validation results with detailed status.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationResults {
    /// File that was validated.
    pub path: PathBuf,
    /// Whether the file parsed as a configuration document.
    pub document_valid: bool,
    /// Whether every task key is in the catalog.
    pub tasks_known: bool,
    /// Task keys found, in document order.
    pub tasks: Vec<String>,
    /// Overall validation status.
    pub passed: bool,
    /// Any warnings or issues found.
    pub warnings: Vec<String>,
}

impl ValidationResults {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Update overall pass/fail status.
    pub fn update_status(&mut self) {
        self.passed = self.document_valid && self.tasks_known;
    }
}

/// Validate the configuration at `path` against `catalog`.
///
/// A missing or unreadable file is an error; everything else is reported
/// through the returned [`ValidationResults`].
pub fn validate_config(path: &Path, catalog: &TaskCatalog) -> Result<ValidationResults> {
    info!(path = %path.display(), "validating configuration");

    if !path.is_file() {
        return Err(GrumgenError::config_invalid(path, "file not found"));
    }
    let content = fs::read_to_string(path)
        .map_err(|e| GrumgenError::persistence("reading config", path, e))?;

    let mut results = ValidationResults::new(path);

    match ConfigDocument::from_yaml(&content) {
        Ok(document) => {
            results.document_valid = true;
            results.tasks = document.task_ids();

            let unknown: Vec<&String> =
                results.tasks.iter().filter(|id| !catalog.contains(id)).collect();
            results.tasks_known = unknown.is_empty();
            let warnings: Vec<String> = unknown
                .into_iter()
                .map(|id| {
                    warn!(task = %id, "unknown task in configuration");
                    format!("Unknown task: {id}")
                })
                .collect();
            results.warnings.extend(warnings);

            if results.tasks.is_empty() {
                results.add_warning("No tasks configured");
            }
        }
        Err(e) => {
            debug!(error = %e, "configuration does not parse");
            results.add_warning(e.to_string());
        }
    }

    results.update_status();
    if results.passed {
        info!("validation passed");
    } else {
        info!(warnings = results.warnings.len(), "validation failed");
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::ConfigAssembler;
    use crate::generator::DocumentWriter;
    use crate::prompt::DefaultsPrompter;
    use tempfile::TempDir;

    fn generated(temp: &TempDir) -> PathBuf {
        let assembler = ConfigAssembler::builtin();
        let tasks = assembler.resolve_selection(["phpcs", "phpstan", "git_blacklist"]).tasks;
        let doc = assembler.assemble(&mut DefaultsPrompter::new(), &tasks).unwrap();
        let path = temp.path().join("grumphp.yml");
        DocumentWriter::new().persist(&path, &doc).unwrap();
        path
    }

    #[test]
    fn test_generated_document_passes() {
        let temp = TempDir::new().unwrap();
        let path = generated(&temp);

        let results = validate_config(&path, &TaskCatalog::builtin()).unwrap();
        assert!(results.passed);
        assert_eq!(results.tasks, vec!["phpcs", "phpstan", "git_blacklist"]);
        assert!(results.warnings.is_empty());
    }

    #[test]
    fn test_unknown_task_fails_with_warning() {
        let temp = TempDir::new().unwrap();
        let path = generated(&temp);
        let content = fs::read_to_string(&path).unwrap();
        fs::write(&path, format!("{content}    rector:\n      level: 1\n")).unwrap();

        let results = validate_config(&path, &TaskCatalog::builtin()).unwrap();
        assert!(results.document_valid);
        assert!(!results.passed);
        assert!(results.warnings.iter().any(|w| w.contains("rector")));
    }

    #[test]
    fn test_malformed_document_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("grumphp.yml");
        fs::write(&path, "parameters:\n  tasks: []\n").unwrap();

        let results = validate_config(&path, &TaskCatalog::builtin()).unwrap();
        assert!(!results.document_valid);
        assert!(!results.passed);
        assert_eq!(results.warnings.len(), 1);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let err = validate_config(&temp.path().join("grumphp.yml"), &TaskCatalog::builtin())
            .unwrap_err();
        assert!(matches!(err, GrumgenError::ConfigInvalid { .. }));
    }
}
