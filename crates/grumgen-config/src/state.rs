//! Key/value state store for operator preferences.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use grumgen_core::Result;
use tracing::debug;

use crate::settings::STATE_DIR;
use crate::store;

/// Whether the last generate run installed packages.
pub const INSTALL_PACKAGES_KEY: &str = "install_packages";

/// Boolean preferences kept in `<project>/.grumgen/state.yaml`.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<project_root>/.grumgen/state.yaml`.
    pub fn for_project(project_root: &Path) -> Self {
        Self::new(project_root.join(STATE_DIR).join("state.yaml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read a flag; `None` when it was never set.
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        let values: BTreeMap<String, bool> = store::read_or_default(&self.path)?;
        Ok(values.get(key).copied())
    }

    /// Set a flag, keeping the others.
    pub fn set_bool(&self, key: &str, value: bool) -> Result<()> {
        let mut values: BTreeMap<String, bool> = store::read_or_default(&self.path)?;
        values.insert(key.to_string(), value);
        store::write(&self.path, &values)?;
        debug!(key, value, "state updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_unset_key_is_none() {
        let temp = TempDir::new().unwrap();
        let state = StateStore::for_project(temp.path());
        assert_eq!(state.get_bool(INSTALL_PACKAGES_KEY).unwrap(), None);
    }

    #[test]
    fn test_set_and_overwrite() {
        let temp = TempDir::new().unwrap();
        let state = StateStore::for_project(temp.path());

        state.set_bool(INSTALL_PACKAGES_KEY, true).unwrap();
        state.set_bool("other", false).unwrap();
        state.set_bool(INSTALL_PACKAGES_KEY, false).unwrap();

        assert_eq!(state.get_bool(INSTALL_PACKAGES_KEY).unwrap(), Some(false));
        assert_eq!(state.get_bool("other").unwrap(), Some(false));
    }
}
