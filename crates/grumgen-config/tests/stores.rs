//! Integration tests for the settings and state stores sharing one project.

use std::fs;

use grumgen_config::{INSTALL_PACKAGES_KEY, STATE_DIR, SettingsStore, StateStore};
use grumgen_core::GrumgenError;
use tempfile::tempdir;

#[test]
fn test_stores_share_the_state_directory() {
    let dir = tempdir().unwrap();
    let settings = SettingsStore::for_project(dir.path());
    let state = StateStore::for_project(dir.path());

    settings
        .record_packages(&["phpro/grumphp".to_string(), "phpstan/phpstan".to_string()])
        .unwrap();
    state.set_bool(INSTALL_PACKAGES_KEY, true).unwrap();

    let state_dir = dir.path().join(STATE_DIR);
    assert!(state_dir.join("settings.yaml").is_file());
    assert!(state_dir.join("state.yaml").is_file());

    assert_eq!(
        SettingsStore::for_project(dir.path()).packages().unwrap(),
        vec!["phpro/grumphp", "phpstan/phpstan"]
    );
    assert_eq!(state.get_bool(INSTALL_PACKAGES_KEY).unwrap(), Some(true));
}

#[test]
fn test_hand_edited_settings_keep_unspecified_defaults() {
    let dir = tempdir().unwrap();
    let store = SettingsStore::for_project(dir.path());
    fs::create_dir_all(dir.path().join(STATE_DIR)).unwrap();
    fs::write(store.path(), "process_timeout: 600\nconfig_path: qa/grumphp.yml\n").unwrap();

    let settings = store.load().unwrap();
    assert_eq!(settings.process_timeout, 600);
    assert_eq!(settings.lint_timeout, 300);
    assert_eq!(settings.config_path_in(dir.path()), dir.path().join("qa/grumphp.yml"));

    store.record_packages(&["phpro/grumphp".to_string()]).unwrap();
    assert_eq!(store.load().unwrap().process_timeout, 600);
}

#[test]
fn test_corrupt_state_file_is_reported() {
    let dir = tempdir().unwrap();
    let state = StateStore::for_project(dir.path());
    fs::create_dir_all(dir.path().join(STATE_DIR)).unwrap();
    fs::write(state.path(), "install_packages: [not, a, bool]\n").unwrap();

    let err = state.get_bool(INSTALL_PACKAGES_KEY).unwrap_err();
    assert!(matches!(err, GrumgenError::ConfigInvalid { .. }));
}
