// Integration testing can be done either by calling library functions directly or by invoking your CLI as a subprocess.
use predicates::prelude::*;
use std::fs;

fn hako() -> assert_cmd::Command {
    assert_cmd::Command::cargo_bin("hako").unwrap()
}

#[test]
fn apply_positional_specs() {
    let tmp = tempfile::tempdir().unwrap();

    hako()
        .arg("apply")
        .arg("src/")
        .arg("src/main.rs")
        .arg("--base")
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("created"))
        .stdout(predicate::str::contains("directory"))
        .stdout(predicate::str::contains("main.rs"));

    assert!(tmp.path().join("src").is_dir());
    assert!(tmp.path().join("src/main.rs").is_file());
}

#[test]
fn apply_example_layout() {
    let tmp = tempfile::tempdir().unwrap();

    hako()
        .args(["apply", "--layout", "example", "--base"])
        .arg(tmp.path())
        .assert()
        .success();

    let root = tmp.path();
    assert!(root.join("test_dir").is_dir());
    assert!(root.join("test_file.txt").is_file());
    assert!(root.join("nested/dir/structure").is_dir());
    assert!(root.join("nested/file/in/deep/path.txt").is_file());
}

#[test]
fn apply_session_cookie_layout() {
    let tmp = tempfile::tempdir().unwrap();

    hako()
        .args(["apply", "--layout", "session-cookie", "--base"])
        .arg(tmp.path())
        .assert()
        .success();

    for file in [
        "app.js",
        "launch.json",
        "test/session.test.js",
        "package.json",
        "memory-store.js",
    ] {
        assert!(tmp.path().join(file).is_file(), "expected {} to be a file", file);
    }
    assert!(tmp.path().join("test").is_dir());
}

#[test]
fn apply_reports_deletions() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("notes.txt"), "old").unwrap();

    hako()
        .args(["apply", "notes.txt", "--base"])
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("deleted"))
        .stdout(predicate::str::contains("notes.txt"));

    assert_eq!(fs::read_to_string(tmp.path().join("notes.txt")).unwrap(), "");
}

#[test]
fn apply_without_specs_prints_nothing() {
    let tmp = tempfile::tempdir().unwrap();

    hako()
        .arg("apply")
        .arg("--base")
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
}

#[test]
fn failing_spec_is_skipped_by_default() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("blocker"), "").unwrap();

    hako()
        .args(["apply", "blocker/child.txt", "after.txt", "--base"])
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("error"))
        .stdout(predicate::str::contains("blocker"));

    assert!(tmp.path().join("after.txt").is_file());
}

#[test]
fn abort_on_error_fails_the_run() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("blocker"), "").unwrap();

    hako()
        .args([
            "apply",
            "blocker/child.txt",
            "after.txt",
            "--abort-on-error",
            "--base",
        ])
        .arg(tmp.path())
        .assert()
        .failure();

    assert!(!tmp.path().join("after.txt").exists());
}

#[test]
fn settings_from_layouts_file_apply() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("blocker"), "").unwrap();
    let config = tmp.path().join("hako.toml");
    fs::write(
        &config,
        "[settings]\ncontinue_on_error = false\n\n[layouts.broken]\nentries = [\"blocker/child.txt\", \"after.txt\"]\n",
    )
    .unwrap();

    hako()
        .args(["apply", "--layout", "broken", "--file"])
        .arg(&config)
        .arg("--base")
        .arg(tmp.path())
        .assert()
        .failure();

    assert!(!tmp.path().join("after.txt").exists());
}

#[test]
fn missing_base_fails() {
    let tmp = tempfile::tempdir().unwrap();

    hako()
        .args(["apply", "a.txt", "--base"])
        .arg(tmp.path().join("missing"))
        .assert()
        .failure();
}

#[test]
fn unknown_layout_fails() {
    let tmp = tempfile::tempdir().unwrap();

    hako()
        .args(["apply", "--layout", "does-not-exist", "--base"])
        .arg(tmp.path())
        .assert()
        .failure();
}

#[test]
fn list_layouts() {
    hako()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("example"))
        .stdout(predicate::str::contains("session-cookie"))
        .stdout(predicate::str::contains("service"));
}

#[test]
fn show_layout() {
    hako()
        .args(["show", "example"])
        .assert()
        .success()
        .stdout(predicate::str::contains("structure"))
        .stdout(predicate::str::contains("path.txt"));
}

#[cfg(unix)]
#[test]
fn failed_deletion_is_reported_and_skipped() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = tempfile::tempdir().unwrap();
    let locked = tmp.path().join("locked");
    fs::create_dir_all(&locked).unwrap();
    fs::write(locked.join("old.txt"), "old").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

    // privileged users ignore directory permissions
    if fs::write(locked.join("write-check"), "").is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let old = fs::canonicalize(&locked).unwrap().join("old.txt");

    let assert = hako()
        .args(["apply", "locked/old.txt", "after.txt", "--base"])
        .arg(tmp.path())
        .assert();

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert
        .success()
        .stdout(predicate::str::contains("error"))
        .stdout(predicate::str::contains("removing a file"))
        .stdout(predicate::str::contains(format!("created file {}", old.display())).not());

    assert_eq!(fs::read_to_string(locked.join("old.txt")).unwrap(), "old");
    assert!(tmp.path().join("after.txt").is_file());
}

#[cfg(unix)]
#[test]
fn symlinked_parent_is_refused() {
    let tmp = tempfile::tempdir().unwrap();
    let outside = tempfile::tempdir().unwrap();
    fs::write(outside.path().join("precious.txt"), "data").unwrap();
    std::os::unix::fs::symlink(outside.path(), tmp.path().join("link")).unwrap();

    hako()
        .args(["apply", "link/precious.txt", "--base"])
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("symlink"));

    assert_eq!(
        fs::read_to_string(outside.path().join("precious.txt")).unwrap(),
        "data"
    );
}
