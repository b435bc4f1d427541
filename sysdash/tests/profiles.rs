//! Tests for profile load/save and resolution logic (non-interactive paths only)
use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use sysdash::config::ProfilesFile;

// Each test gets its own config dir through XDG_CONFIG_HOME on the child process.
fn run_sysdash(config_home: &Path, args: &[&str]) -> (bool, String) {
    let output = Command::cargo_bin("sysdash")
        .expect("sysdash binary")
        .env("XDG_CONFIG_HOME", config_home)
        .args(args)
        .output()
        .expect("run sysdash");
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    (output.status.success(), text)
}

fn profiles_path(config_home: &Path) -> PathBuf {
    config_home.join("sysdash").join("profiles.json")
}

fn read_profiles(config_home: &Path) -> ProfilesFile {
    let data = fs::read_to_string(profiles_path(config_home)).expect("profiles.json exists");
    serde_json::from_str(&data).expect("profiles.json parses")
}

#[test]
fn test_profile_created_on_first_use() {
    let td = tempfile::tempdir().unwrap();
    let (ok, out) = run_sysdash(td.path(), &["--profile", "unittest", "http://example:1", "--dry-run"]);
    assert!(ok, "{out}");
    let pf = read_profiles(td.path());
    assert_eq!(pf.profiles["unittest"].url, "http://example:1");
}

#[test]
fn test_profile_overwrite_only_when_changed() {
    let td = tempfile::tempdir().unwrap();
    run_sysdash(td.path(), &["--profile", "prod", "http://one:5000", "--dry-run"]);
    let first = fs::read_to_string(profiles_path(td.path())).unwrap();

    // Identical input must not touch the file
    run_sysdash(td.path(), &["--profile", "prod", "http://one:5000", "--dry-run"]);
    let second = fs::read_to_string(profiles_path(td.path())).unwrap();
    assert_eq!(first, second, "Profile file changed despite identical input");

    // Different URL with --save overwrites without prompting
    run_sysdash(td.path(), &["--profile", "prod", "--save", "http://two:5000", "--dry-run"]);
    assert_eq!(read_profiles(td.path()).profiles["prod"].url, "http://two:5000");
}

#[test]
fn test_profile_loaded_by_name() {
    let td = tempfile::tempdir().unwrap();
    run_sysdash(td.path(), &["-P", "lab", "lab.local:8080", "--dry-run"]);
    let (ok, out) = run_sysdash(td.path(), &["-P", "lab", "--dry-run"]);
    assert!(ok, "{out}");
    assert!(out.contains("backend: http://lab.local:8080/"), "{out}");
}

#[test]
fn test_profile_tls_ca_persisted() {
    let td = tempfile::tempdir().unwrap();
    run_sysdash(
        td.path(),
        &["--profile", "secureX", "--tls-ca", "/tmp/cert.pem", "https://host", "--dry-run"],
    );
    let pf = read_profiles(td.path());
    assert_eq!(pf.profiles["secureX"].tls_ca.as_deref(), Some("/tmp/cert.pem"));
}

#[test]
fn test_no_url_and_no_profiles() {
    let td = tempfile::tempdir().unwrap();
    let (ok, out) = run_sysdash(td.path(), &["--dry-run"]);
    assert!(ok);
    assert!(out.contains("No URL provided"), "{out}");
    assert!(!profiles_path(td.path()).exists());
}
