use std::fs::write;

use helpers::*;
use pretty_assertions::assert_eq;

mod helpers;

const RELEASES: &str = "\
acme:
  widget:
    tag: v1.2.0
    description: |-
      * Add feature
  gadget:
    tag: null
    description: '* Not ready yet'
";

/// A dry run prints one release config per tagged repository and sends nothing.
#[test]
fn dry_run() {
    let temp_dir = tempfile::tempdir().unwrap();
    write(temp_dir.path().join("releases.yml"), RELEASES).unwrap();

    let assert = release_tool(temp_dir.path())
        .args(["apply", "--dry-run", "--release-branch", "main"])
        .assert()
        .success();

    let stdout = stdout_of(assert.get_output());
    let (header, config) = stdout.split_once('\n').unwrap();
    assert_eq!(header, "acme/widget: release config:");
    let config: serde_yaml::Value = serde_yaml::from_str(config).unwrap();
    assert_eq!(config["tag_name"].as_str(), Some("v1.2.0"));
    assert_eq!(config["target_commitish"].as_str(), Some("main"));
    assert_eq!(config["name"].as_str(), Some("v1.2.0"));
    assert_eq!(config["body"].as_str(), Some("* Add feature"));
    assert_eq!(config["draft"].as_bool(), Some(false));
    assert_eq!(config["prerelease"].as_bool(), Some(false));
    assert!(!stdout.contains("gadget"));
}

/// Without `--dry-run` every release is attempted, and any failure fails the whole command.
#[test]
fn unreachable_platform_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    write(temp_dir.path().join("edited.yml"), RELEASES).unwrap();

    let assert = release_tool(temp_dir.path())
        .args(["apply", "-f", "edited.yml"])
        .assert()
        .failure();

    let stderr = stderr_of(assert.get_output());
    assert!(
        stderr.contains("Could not create release v1.2.0 of acme/widget"),
        "{stderr}"
    );
    assert!(stderr.contains("release failed for 1 of the repositories"), "{stderr}");
    assert_eq!(stdout_of(assert.get_output()), "");
}

#[test]
fn missing_releases_file() {
    let temp_dir = tempfile::tempdir().unwrap();

    let assert = release_tool(temp_dir.path())
        .args(["apply", "--dry-run"])
        .assert()
        .failure();

    let stderr = stderr_of(assert.get_output());
    assert!(stderr.contains("releases.yml"), "{stderr}");
}
