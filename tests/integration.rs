use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_tdoc")))
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name)).unwrap()
}

// -- stdin mode --

#[test]
fn stdin_mode_generates_tests() {
    let assert = cmd().write_stdin(fixture("calc.py")).assert().success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(output, fixture("calc.expected_tests.py"));
}

#[test]
fn stdin_mode_markdown() {
    let assert = cmd()
        .args(["-f", "markdown"])
        .write_stdin(fixture("calc.py"))
        .assert()
        .success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(output, fixture("calc.expected.md"));
}

#[test]
fn stdin_mode_json() {
    let assert = cmd()
        .args(["-f", "json"])
        .write_stdin(fixture("calc.py"))
        .assert()
        .success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(output.contains("\"test_name\": \"test_add_6_1\""), "Got: {output}");
    assert!(output.contains("\"name\": \"Calculator.add\""), "Got: {output}");
    assert!(output.contains("\"skipped\": 0"), "Got: {output}");
}

#[test]
fn stdin_mode_is_deterministic() {
    let first = cmd().write_stdin(fixture("calc.py")).assert().success();
    let second = cmd().write_stdin(fixture("calc.py")).assert().success();
    assert_eq!(first.get_output().stdout, second.get_output().stdout);
}

#[test]
fn stdin_markdown_without_module_docs_starts_at_function() {
    let assert = cmd()
        .args(["-f", "markdown"])
        .write_stdin(fixture("plain.py"))
        .assert()
        .success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(output.starts_with("## ping\n"), "Got: {output}");
    assert!(output.contains("Answers with pong."), "Got: {output}");
}

// -- file mode --

#[test]
fn file_mode_writes_test_file() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("calc.py"))
        .assert()
        .success();

    let output = std::fs::read_to_string(dir.path().join("test_calc.py")).unwrap();
    assert!(output.contains("from calc import *"), "Got: {output}");
    assert!(output.contains("def test_Calculator_40_1():"), "Got: {output}");
}

#[test]
fn file_mode_markdown_format() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .args(["-f", "markdown"])
        .arg(fixture_path("calc.py"))
        .assert()
        .success();

    let output = std::fs::read_to_string(dir.path().join("calc.md")).unwrap();
    assert!(output.starts_with("# calc\n"), "Got: {output}");
}

#[test]
fn file_mode_json_format() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .args(["-f", "json"])
        .arg(fixture_path("calc.py"))
        .assert()
        .success();

    let output = std::fs::read_to_string(dir.path().join("calc.json")).unwrap();
    assert!(output.contains("\"definitions\""), "Got: {output}");
    assert!(output.contains("calc.py"), "Got: {output}");
}

#[test]
fn file_mode_multiple_files() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("calc.py"))
        .arg(fixture_path("edge.py"))
        .assert()
        .success();

    assert!(dir.path().join("test_calc.py").exists());
    assert!(dir.path().join("test_edge.py").exists());
}

#[test]
fn file_mode_expands_directory_arguments() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    std::fs::copy(fixture_path("calc.py"), src.path().join("calc.py")).unwrap();
    std::fs::write(src.path().join("notes.txt"), "not python\n").unwrap();

    cmd()
        .args(["-o", out.path().to_str().unwrap()])
        .arg(src.path().to_str().unwrap())
        .assert()
        .success();

    assert!(out.path().join("test_calc.py").exists());
    assert!(!out.path().join("test_notes.py").exists());
}

#[test]
fn file_mode_skips_files_with_nothing_to_emit() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("plain.py"))
        .assert()
        .success();

    assert!(!dir.path().join("test_plain.py").exists());
}

#[test]
fn file_mode_requires_output() {
    cmd()
        .arg(fixture_path("calc.py"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("--output is required"));
}

// -- error reporting --

#[test]
fn invalid_format_fails() {
    cmd()
        .args(["-f", "xml"])
        .write_stdin(fixture("calc.py"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}

#[test]
fn unreadable_file_is_skipped_with_warning() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let bad = src.path().join("bad.py");
    std::fs::write(&bad, [0xff, 0xfe, 0x00]).unwrap();

    cmd()
        .args(["-o", out.path().to_str().unwrap()])
        .arg(bad.to_str().unwrap())
        .arg(fixture_path("calc.py"))
        .assert()
        .success()
        .stderr(predicate::str::contains("warning: skipping"));

    assert!(out.path().join("test_calc.py").exists());
    assert!(!out.path().join("test_bad.py").exists());
}

#[test]
fn unparseable_statement_warns_but_still_generates() {
    let assert = cmd()
        .write_stdin(fixture("edge.py"))
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "skipped 1 unparseable test statement(s)",
        ));

    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(output.contains("def test_greet_3_1():"), "Got: {output}");
    assert!(!output.contains("broken(1,"), "Got: {output}");
}
