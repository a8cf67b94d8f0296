//! # grumgen-core
//!
//! Core types, errors, and utilities for grumgen.
//!
//! This crate provides:
//! - [`GrumgenError`] - Error type shared by every grumgen crate
//! - [`logging`] - Tracing setup and log file locations
//! - [`types`] - Identifiers and list helpers used across crates
//!
//! ## Example
//!
//! ```no_run
//! use grumgen_core::{GrumgenError, logging};
//!
//! fn main() -> grumgen_core::Result<()> {
//!     let _guard = logging::init_logging(None, false)?;
//!
//!     let config_path = std::path::Path::new("grumphp.yml");
//!     if !config_path.exists() {
//!         return Err(GrumgenError::config_invalid(config_path, "missing"));
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod logging;
pub mod types;

pub use error::{GrumgenError, Result};
pub use logging::{LogGuard, init_logging};
pub use types::{ORCHESTRATOR_PACKAGE, PackageId, TaskId};
