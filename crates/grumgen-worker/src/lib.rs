//! External process execution for grumgen.
//!
//! This crate drives the two binaries grumgen depends on: Composer, to
//! install and remove the dev-dependencies a configuration needs, and
//! GrumPHP, to run the configured checks.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐   ┌──────────────────────┐
//! │   PackageInstaller   │   │       Checker        │
//! │ (require/remove/show)│   │  (grumphp run)       │
//! └──────────┬───────────┘   └──────────┬───────────┘
//!            │                          │
//!            └────────────┬─────────────┘
//!                         ▼
//!              ┌──────────────────────┐
//!              │    CommandRunner     │
//!              │ (tokio::process +    │
//!              │  timeout)            │
//!              └──────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use std::time::Duration;
//! use grumgen_config::SettingsStore;
//! use grumgen_worker::{PackageInstaller, TokioRunner};
//!
//! # async fn example() -> grumgen_core::Result<()> {
//! let root = Path::new(".");
//! let installer = PackageInstaller::new(
//!     Arc::new(TokioRunner::new()),
//!     "composer",
//!     root,
//!     Duration::from_secs(300),
//!     SettingsStore::for_project(root),
//! )?;
//!
//! let report = installer.install(&["phpro/grumphp".to_string()]).await?;
//! println!("{:?}", report.status);
//! # Ok(())
//! # }
//! ```

pub mod checker;
pub mod installer;
pub mod process;
pub mod types;

pub use checker::{Checker, grumphp_args, result_file_name};
pub use installer::PackageInstaller;
pub use process::{CommandRunner, CommandSpec, ProcessResult, ProcessStatus, TokioRunner};
pub use types::{CheckOutcome, InstallReport, InstallStatus, PackageOutcome, PackageState};
