//! Integration tests running the installer and checker against stand-in
//! `composer` and `grumphp` shell scripts.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use grumgen_config::SettingsStore;
use grumgen_worker::{
    Checker, InstallStatus, PackageInstaller, PackageState, TokioRunner,
};
use tempfile::tempdir;

/// Stand-in composer: `show` succeeds for packages listed in `installed.txt`,
/// `require` fails for `broken/package`, every call is appended to `calls.log`.
const FAKE_COMPOSER: &str = r#"#!/bin/sh
dir="$(dirname "$0")"
echo "$@" >> "$dir/calls.log"
case "$1" in
  show)
    grep -qx "$2" "$dir/installed.txt" 2>/dev/null
    exit $?
    ;;
  require)
    if [ "$2" = "broken/package" ]; then
      echo "Could not find package $2" >&2
      exit 2
    fi
    ;;
esac
exit 0
"#;

const FAKE_GRUMPHP: &str = r#"#!/bin/sh
echo "args: $@"
echo "phpcs: 1 error" >&2
exit 1
"#;

fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

#[tokio::test]
async fn test_install_with_real_processes() {
    let tools = tempdir().unwrap();
    let project = tempdir().unwrap();
    let composer = script(tools.path(), "composer", FAKE_COMPOSER);
    fs::write(tools.path().join("installed.txt"), "phpro/grumphp\n").unwrap();

    let installer = PackageInstaller::new(
        Arc::new(TokioRunner::new()),
        &composer,
        project.path(),
        Duration::from_secs(30),
        SettingsStore::for_project(project.path()),
    )
    .unwrap()
    .with_progress(false);

    let packages: Vec<String> = ["phpro/grumphp", "broken/package", "phpmd/phpmd"]
        .into_iter()
        .map(String::from)
        .collect();
    let report = installer.install(&packages).await.unwrap();

    assert_eq!(report.status, InstallStatus::PartialFailure);
    let states: Vec<PackageState> = report.outcomes.iter().map(|o| o.state).collect();
    assert_eq!(
        states,
        vec![PackageState::AlreadyInstalled, PackageState::Failed, PackageState::Installed]
    );
    assert!(report.outcomes[1].message.as_deref().unwrap().contains("Could not find package"));

    let calls = fs::read_to_string(tools.path().join("calls.log")).unwrap();
    let requires: Vec<&str> = calls.lines().filter(|l| l.starts_with("require")).collect();
    assert_eq!(requires.len(), 2);
    assert!(requires.iter().all(|l| l.contains("--dev") && l.ends_with("--no-interaction")));

    assert_eq!(
        SettingsStore::for_project(project.path()).packages().unwrap(),
        packages
    );
}

#[tokio::test]
async fn test_check_saves_combined_output() {
    let project = tempdir().unwrap();
    fs::create_dir_all(project.path().join("vendor/bin")).unwrap();
    let grumphp = script(&project.path().join("vendor/bin"), "grumphp", FAKE_GRUMPHP);
    let results_dir = project.path().join(".grumgen/results");

    let checker = Checker::new(
        Arc::new(TokioRunner::new()),
        grumphp,
        project.path(),
        &results_dir,
        Duration::from_secs(30),
    );
    let outcome = checker.run(Some("phpcs, phplint")).await.unwrap();

    assert!(!outcome.passed);
    assert_eq!(outcome.exit_code, Some(1));
    assert!(outcome.result_file.starts_with(results_dir.canonicalize().unwrap()));

    let name = outcome.result_file.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("result_") && name.ends_with(".txt"));

    let saved = fs::read_to_string(&outcome.result_file).unwrap();
    assert_eq!(
        saved,
        "args: run --no-interaction --tasks=phpcs --tasks=phplint\nphpcs: 1 error\n"
    );
}
