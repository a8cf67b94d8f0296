//! Types describing package installation and lint runs.

use std::fmt;
use std::path::PathBuf;

use grumgen_core::PackageId;
use serde::Serialize;

/// Per-package state.
///
/// Install: `Pending → Checking → {AlreadyInstalled | Installing} → {Installed | Failed}`.
/// Removal: `Pending → Checking → {NotInstalled | Removing} → {Removed | Failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageState {
    Pending,
    Checking,
    AlreadyInstalled,
    Installing,
    Installed,
    NotInstalled,
    Removing,
    Removed,
    Failed,
}

impl PackageState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::AlreadyInstalled | Self::Installed | Self::NotInstalled | Self::Removed | Self::Failed
        )
    }

    /// Whether `next` is a legal successor of `self`.
    pub fn can_transition_to(&self, next: PackageState) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Checking)
                | (Self::Checking, Self::AlreadyInstalled)
                | (Self::Checking, Self::Installing)
                | (Self::Checking, Self::NotInstalled)
                | (Self::Checking, Self::Removing)
                | (Self::Installing, Self::Installed)
                | (Self::Installing, Self::Failed)
                | (Self::Removing, Self::Removed)
                | (Self::Removing, Self::Failed)
        )
    }
}

impl fmt::Display for PackageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "pending",
            Self::Checking => "checking",
            Self::AlreadyInstalled => "already installed",
            Self::Installing => "installing",
            Self::Installed => "installed",
            Self::NotInstalled => "not installed",
            Self::Removing => "removing",
            Self::Removed => "removed",
            Self::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Final state of one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageOutcome {
    pub package: PackageId,
    pub state: PackageState,
    /// Failure detail for [`PackageState::Failed`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PackageOutcome {
    pub fn new(package: impl Into<PackageId>, state: PackageState) -> Self {
        Self {
            package: package.into(),
            state,
            message: None,
        }
    }

    pub fn failed(package: impl Into<PackageId>, message: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            state: PackageState::Failed,
            message: Some(message.into()),
        }
    }
}

/// Aggregate installer status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallStatus {
    Success,
    PartialFailure,
}

/// Outcome of an install or remove batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallReport {
    pub outcomes: Vec<PackageOutcome>,
    pub status: InstallStatus,
}

impl InstallReport {
    pub fn new(outcomes: Vec<PackageOutcome>) -> Self {
        let status = if outcomes.iter().any(|o| o.state == PackageState::Failed) {
            InstallStatus::PartialFailure
        } else {
            InstallStatus::Success
        };
        Self { outcomes, status }
    }

    pub fn is_success(&self) -> bool {
        self.status == InstallStatus::Success
    }

    pub fn failed(&self) -> impl Iterator<Item = &PackageOutcome> {
        self.outcomes.iter().filter(|o| o.state == PackageState::Failed)
    }

    pub fn count(&self, state: PackageState) -> usize {
        self.outcomes.iter().filter(|o| o.state == state).count()
    }
}

/// Result of a GrumPHP run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    pub passed: bool,
    pub exit_code: Option<i32>,
    pub timed_out: bool,
    /// Canonical path of the saved output.
    pub result_file: PathBuf,
    /// `file://` URL of `result_file`.
    pub result_url: String,
}
