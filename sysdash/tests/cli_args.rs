//! CLI arg tests for sysdash, run against the built binary.
use assert_cmd::Command;

fn sysdash() -> Command {
    let mut cmd = Command::cargo_bin("sysdash").expect("sysdash binary");
    // keep profile lookups away from the real config dir
    let td = std::env::temp_dir().join("sysdash-cli-tests");
    cmd.env("XDG_CONFIG_HOME", td);
    cmd
}

fn output_text(out: &std::process::Output) -> String {
    format!(
        "{}{}",
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr)
    )
}

#[test]
fn test_help_mentions_short_and_long_flags() {
    let out = sysdash().arg("--help").output().expect("run sysdash --help");
    assert!(out.status.success());
    let text = output_text(&out);
    assert!(
        text.contains("--tls-ca")
            && text.contains("-t")
            && text.contains("--profile")
            && text.contains("-P")
            && text.contains("--utc"),
        "help text missing expected flags\n{text}"
    );
}

#[test]
fn test_help_wins_over_other_flags() {
    for args in [
        vec!["--tls-ca", "/tmp/cert.pem", "--help"],
        vec!["-t", "/tmp/cert.pem", "--help"],
        vec!["--profile", "dev", "--help"],
    ] {
        let out = sysdash().args(&args).output().expect("run sysdash");
        assert!(out.status.success(), "sysdash {args:?} did not succeed");
        assert!(output_text(&out).contains("Usage:"));
    }
}

#[test]
fn test_extra_positional_is_rejected() {
    let out = sysdash()
        .args(["http://a:1", "http://b:2"])
        .output()
        .expect("run sysdash");
    assert_eq!(out.status.code(), Some(2));
    assert!(output_text(&out).contains("Unexpected argument"));
}

#[test]
fn test_dry_run_prints_normalised_backend() {
    let out = sysdash()
        .args(["--dry-run", "mon.lan:5000"])
        .output()
        .expect("run sysdash");
    assert!(out.status.success());
    assert!(output_text(&out).contains("backend: http://mon.lan:5000/"));
}
