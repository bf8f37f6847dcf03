//! CLI integration tests driving the built binary against temporary
//! manifests. Nothing here touches the network: the commands exercised
//! only plan, list, validate, or remove local files.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

const MANIFEST: &str = r#"
[servers.example]
address = "example.com"

[packages.sdl]
server = "example"
project = "grp/proj"
project-name = "sdl"
package = "generic/build"
version = "1.2.3"

[[packages.sdl.artifacts]]
file = "out-linux-x64.zip"
suffix = "linuxX64"

[mirrors.sdl-headers]
url = "https://github.com/libsdl-org/SDL"
"#;

fn write_manifest(content: &str) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("bindrig.toml");
    std::fs::write(&path, content).unwrap();
    (tmp, path)
}

fn bindrig() -> Command {
    Command::cargo_bin("bindrig").unwrap()
}

#[test]
fn list_shows_tasks_grouped_by_label() {
    let (_tmp, manifest) = write_manifest(MANIFEST);
    bindrig()
        .args(["list", "--manifest-path"])
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::str::contains("downloadSdlLinuxX64"))
        .stdout(predicate::str::contains("extractSdlLinuxX64"))
        .stdout(predicate::str::contains("pullSdlheaders"))
        .stdout(predicate::str::contains("sdl"));
}

#[test]
fn validate_accepts_a_well_formed_manifest() {
    let (_tmp, manifest) = write_manifest(MANIFEST);
    bindrig()
        .args(["validate", "--manifest-path"])
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::str::contains("manifest is valid"));
}

#[test]
fn validate_rejects_a_dangling_server_reference() {
    let (_tmp, manifest) = write_manifest(
        r#"
        [packages.sdl]
        server = "missing"
        project = "grp/proj"
        package = "generic/build"
        version = "1.2.3"

        [[packages.sdl.artifacts]]
        file = "out.zip"
        "#,
    );
    bindrig()
        .args(["validate", "--manifest-path"])
        .arg(&manifest)
        .assert()
        .failure()
        .stderr(predicate::str::contains("undefined server"));
}

#[test]
fn clean_succeeds_with_nothing_cached() {
    let (_tmp, manifest) = write_manifest(MANIFEST);
    bindrig()
        .args(["clean", "--no-progress", "--manifest-path"])
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::str::contains("executed"));
}

#[test]
fn run_rejects_unknown_task_names() {
    let (_tmp, manifest) = write_manifest(MANIFEST);
    bindrig()
        .args(["run", "downloadNothing", "--manifest-path"])
        .arg(&manifest)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No task named 'downloadNothing'"));
}

#[test]
fn missing_manifest_is_reported() {
    let tmp = TempDir::new().unwrap();
    bindrig()
        .arg("list")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("bindrig.toml"));
}
