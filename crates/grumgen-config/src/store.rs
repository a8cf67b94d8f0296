//! YAML file helpers shared by the settings and state stores.

use std::fs;
use std::path::Path;

use grumgen_core::{GrumgenError, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Read a YAML store, returning the default value when the file is missing.
pub(crate) fn read_or_default<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    if !path.exists() {
        debug!(path = %path.display(), "store file missing, using defaults");
        return Ok(T::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| GrumgenError::persistence("reading store", path, e))?;

    if content.trim().is_empty() {
        return Ok(T::default());
    }

    serde_yaml::from_str(&content).map_err(|e| GrumgenError::config_invalid(path, e.to_string()))
}

/// Serialize `value` to YAML and write it, creating the parent directory.
pub(crate) fn write<T>(path: &Path, value: &T) -> Result<()>
where
    T: Serialize,
{
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| GrumgenError::directory_creation(parent, e))?;
    }

    let yaml = serde_yaml::to_string(value)
        .map_err(|e| GrumgenError::yaml(path.display().to_string(), e))?;

    fs::write(path, yaml).map_err(|e| GrumgenError::persistence("writing store", path, e))?;
    debug!(path = %path.display(), "store saved");
    Ok(())
}
