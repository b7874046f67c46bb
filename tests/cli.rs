use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use predicates::str::is_empty;
use std::fs;
use std::io::Write;
use std::process::Command;
use std::process::Stdio;
use tempfile::TempDir;

fn kvtable() -> Command {
    Command::cargo_bin("kvtable").unwrap()
}

// `kvtable` with no args should exit with a non-zero code.
#[test]
fn cli_no_args() {
    kvtable().assert().failure();
}

// `kvtable -V` should print the version
#[test]
fn cli_version() {
    kvtable()
        .args(&["-V"])
        .assert()
        .stdout(contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn cli_demo() {
    kvtable().args(&["demo"]).assert().success().stdout("45\n");
}

#[test]
fn cli_run_file() {
    let temp_dir = TempDir::new().expect("unable to create temporary working directory");
    let script = temp_dir.path().join("script.kvt");
    fs::write(
        &script,
        "# chained lookups\nset hello 1\nset world 2\nset hi 45\nget hi\nget nonexistent\n",
    )
    .unwrap();

    kvtable()
        .arg("run")
        .arg(&script)
        .assert()
        .success()
        .stdout("45\nKey not found\n");
}

#[test]
fn cli_run_stdin() {
    let mut child = kvtable()
        .args(&["run"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"set key1 value one\nget key1\nrm key1\nrm key1\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "value one\nKey not found\n"
    );
}

#[test]
fn cli_duplicate_policies() {
    let temp_dir = TempDir::new().unwrap();
    let script = temp_dir.path().join("dupes.kvt");
    fs::write(&script, "set a 1\nset a 2\nget a\n").unwrap();

    kvtable()
        .arg("run")
        .arg(&script)
        .assert()
        .success()
        .stdout("2\n");

    kvtable()
        .args(&["--policy", "append", "run"])
        .arg(&script)
        .assert()
        .success()
        .stdout("1\n");
}

#[test]
fn cli_stats() {
    let temp_dir = TempDir::new().unwrap();
    let script = temp_dir.path().join("stats.kvt");
    fs::write(&script, "set hello 1\nset world 2\nset hi 45\n").unwrap();

    kvtable()
        .args(&["--buckets", "7", "run", "--stats"])
        .arg(&script)
        .assert()
        .success()
        .stdout(contains("bucket 0: 1\n"))
        .stdout(contains("bucket 5: 2\n"))
        .stdout(contains("bucket 6: 0\n"));
}

#[test]
fn cli_invalid_buckets() {
    kvtable()
        .args(&["--buckets", "0", "demo"])
        .assert()
        .failure()
        .stdout(is_empty())
        .stderr(contains("bucket count"));
}

#[test]
fn cli_invalid_load_factor() {
    kvtable()
        .args(&["--max-load-factor", "-1", "demo"])
        .assert()
        .failure();
}

#[test]
fn cli_malformed_script() {
    let temp_dir = TempDir::new().unwrap();
    let script = temp_dir.path().join("bad.kvt");
    fs::write(&script, "set a 1\nfetch a\n").unwrap();

    kvtable()
        .arg("run")
        .arg(&script)
        .assert()
        .failure()
        .stdout(is_empty())
        .stderr(contains("fetch"));
}

#[test]
fn cli_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    kvtable()
        .arg("run")
        .arg(temp_dir.path().join("missing.kvt"))
        .assert()
        .failure();
}

#[test]
fn cli_verbose_logs_resize() {
    kvtable()
        .args(&["--verbose", "--buckets", "1", "--max-load-factor", "0.5", "demo"])
        .assert()
        .success()
        .stdout("45\n")
        .stderr(contains("created table"))
        .stderr(contains("resizing table"));

    kvtable()
        .args(&["--buckets", "1", "--max-load-factor", "0.5", "demo"])
        .assert()
        .success()
        .stdout("45\n")
        .stderr(contains("starting up"))
        .stderr(contains("resizing table").not());
}
