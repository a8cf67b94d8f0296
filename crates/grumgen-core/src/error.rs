//! Error types for grumgen operations.
//!
//! This module defines [`GrumgenError`], the error enum shared by every grumgen
//! crate. Operator-facing failures carry enough context to act on: the path that
//! could not be written, the binaries that were probed, the tool that failed.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias using [`GrumgenError`].
pub type Result<T> = std::result::Result<T, GrumgenError>;

/// Error type for all grumgen operations.
///
/// Per-package installer failures are not represented here: they are recorded
/// in the install report and never abort a batch.
#[derive(Debug, Error)]
pub enum GrumgenError {
    // =========================================================================
    // Operator Errors
    // =========================================================================
    /// Operator declined an irreversible action (e.g. overwriting a config)
    #[error("Aborted: {message}")]
    UserAbort { message: String },

    /// Operator supplied a value that cannot be used
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Prompting failed (no terminal, cancelled, I/O)
    #[error("Prompt failed: {message}")]
    Prompt { message: String },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Configuration file exists but does not describe a valid document
    #[error("Invalid configuration at {path}: {message}")]
    ConfigInvalid { path: PathBuf, message: String },

    /// YAML (de)serialization error
    #[error("YAML error in {context}: {message}")]
    YamlParse { context: String, message: String },

    // =========================================================================
    // Persistence Errors
    // =========================================================================
    /// Writing or deleting a file failed
    #[error("Failed {operation}: {path}: {source}")]
    Persistence {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory creation failed
    #[error("Failed to create directory: {path}: {source}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Project working directory could not be resolved
    #[error("Cannot resolve working directory: {path}: {source}")]
    WorkingDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // =========================================================================
    // External Tool Errors
    // =========================================================================
    /// Required binary absent from every probed location
    #[error("{tool} not found (tried: {})", display_paths(.attempted))]
    ExternalToolNotFound { tool: String, attempted: Vec<PathBuf> },

    /// Invoked process could not be started or exited unsuccessfully
    #[error("{tool} failed: {message}")]
    ExternalToolFailure { tool: String, message: String },

    // =========================================================================
    // Internal Errors
    // =========================================================================
    /// Internal error (bug in grumgen)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl GrumgenError {
    // =========================================================================
    // Constructor helpers for common error patterns
    // =========================================================================

    /// Create a UserAbort error
    pub fn user_abort(message: impl Into<String>) -> Self {
        Self::UserAbort {
            message: message.into(),
        }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a Persistence error
    pub fn persistence(
        operation: impl Into<String>,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Persistence {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }

    /// Create a DirectoryCreation error
    pub fn directory_creation(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryCreation {
            path: path.into(),
            source,
        }
    }

    /// Create a YamlParse error from any displayable cause
    pub fn yaml(context: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        Self::YamlParse {
            context: context.into(),
            message: cause.to_string(),
        }
    }

    /// Create an ExternalToolNotFound error
    pub fn tool_not_found(tool: impl Into<String>, attempted: Vec<PathBuf>) -> Self {
        Self::ExternalToolNotFound {
            tool: tool.into(),
            attempted,
        }
    }

    /// Create an ExternalToolFailure error
    pub fn tool_failure(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExternalToolFailure {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Create a ConfigInvalid error
    pub fn config_invalid(path: &Path, message: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    // =========================================================================
    // Error classification helpers
    // =========================================================================

    /// Returns true if the operator chose to stop; this is an expected exit.
    pub fn is_user_abort(&self) -> bool {
        matches!(self, Self::UserAbort { .. })
    }

    /// Returns actionable guidance for the operator
    pub fn guidance(&self) -> Option<&'static str> {
        match self {
            Self::ExternalToolNotFound { tool, .. } if tool == "composer" => {
                Some("Install Composer and make sure it is on PATH")
            }
            Self::ExternalToolNotFound { .. } => {
                Some("Run 'grumgen generate-install' to install phpro/grumphp first")
            }
            Self::ConfigInvalid { .. } | Self::YamlParse { .. } => {
                Some("Regenerate the file with 'grumgen generate-no-install'")
            }
            Self::Persistence { .. } | Self::DirectoryCreation { .. } => {
                Some("Check file permissions and free disk space")
            }
            Self::Prompt { .. } => Some("Run in an interactive terminal or pass --defaults"),
            Self::WorkingDirectory { .. } => Some("Pass an existing directory with --project-root"),
            _ => None,
        }
    }
}
