//! Locating the external binaries grumgen drives.
//!
//! Composer is resolved through `PATH`. GrumPHP is installed per project by
//! Composer, so it is probed at fixed locations relative to the project root:
//! the project's own `vendor/bin` first, then the parent's (for Drupal
//! layouts where the web root sits one level below `composer.json`).

use std::path::{Path, PathBuf};

use grumgen_core::{GrumgenError, Result};
use tracing::{debug, info};

/// Composer executable name.
pub const COMPOSER_BINARY: &str = "composer";

/// GrumPHP executable name.
pub const GRUMPHP_BINARY: &str = "grumphp";

/// GrumPHP locations relative to the project root, probed in order.
pub const GRUMPHP_CANDIDATES: &[&str] = &["vendor/bin/grumphp", "../vendor/bin/grumphp"];

/// Candidate GrumPHP paths for `project_root`, in probing order.
pub fn grumphp_candidates(project_root: &Path) -> Vec<PathBuf> {
    GRUMPHP_CANDIDATES
        .iter()
        .map(|candidate| project_root.join(candidate))
        .collect()
}

/// First existing GrumPHP candidate.
///
/// Fails with [`GrumgenError::ExternalToolNotFound`] listing every probed path.
pub fn locate_grumphp(project_root: &Path) -> Result<PathBuf> {
    let candidates = grumphp_candidates(project_root);
    for candidate in &candidates {
        if candidate.is_file() {
            info!(path = %candidate.display(), "found grumphp");
            return Ok(candidate.clone());
        }
        debug!(path = %candidate.display(), "grumphp not at candidate");
    }
    Err(GrumgenError::tool_not_found(GRUMPHP_BINARY, candidates))
}

/// Resolve Composer through `PATH`.
pub fn locate_composer() -> Result<PathBuf> {
    match which::which(COMPOSER_BINARY) {
        Ok(path) => {
            debug!(path = %path.display(), "found composer");
            Ok(path)
        }
        Err(e) => {
            debug!(error = %e, "composer not on PATH");
            Err(GrumgenError::tool_not_found(
                COMPOSER_BINARY,
                vec![PathBuf::from(COMPOSER_BINARY)],
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "#!/bin/sh\n").unwrap();
    }

    #[test]
    fn test_candidates_order() {
        let root = Path::new("/srv/site/web");
        assert_eq!(
            grumphp_candidates(root),
            vec![
                PathBuf::from("/srv/site/web/vendor/bin/grumphp"),
                PathBuf::from("/srv/site/web/../vendor/bin/grumphp"),
            ]
        );
    }

    #[test]
    fn test_locate_prefers_project_vendor() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("web");
        touch(&root.join("vendor/bin/grumphp"));
        touch(&temp.path().join("vendor/bin/grumphp"));

        assert_eq!(locate_grumphp(&root).unwrap(), root.join("vendor/bin/grumphp"));
    }

    #[test]
    fn test_locate_falls_back_to_parent_vendor() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("web");
        fs::create_dir_all(&root).unwrap();
        touch(&temp.path().join("vendor/bin/grumphp"));

        assert_eq!(
            locate_grumphp(&root).unwrap(),
            root.join("../vendor/bin/grumphp")
        );
    }

    #[test]
    fn test_missing_grumphp_lists_attempts() {
        let temp = TempDir::new().unwrap();
        let err = locate_grumphp(temp.path()).unwrap_err();
        match err {
            GrumgenError::ExternalToolNotFound { tool, attempted } => {
                assert_eq!(tool, "grumphp");
                assert_eq!(attempted, grumphp_candidates(temp.path()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
