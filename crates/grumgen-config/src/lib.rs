//! Configuration management for grumgen.
//!
//! Two small YAML-backed stores live under `<project>/.grumgen/`:
//! [`SettingsStore`] for structured settings (timeouts, paths, the persisted
//! package selection) and [`StateStore`] for boolean operator preferences.

pub mod settings;
pub mod state;
mod store;

pub use settings::{Settings, SettingsStore, STATE_DIR};
pub use state::{INSTALL_PACKAGES_KEY, StateStore};
