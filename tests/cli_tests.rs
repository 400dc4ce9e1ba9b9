// End-to-end runs of the `webidl` binary against files in a scratch directory.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn webidl() -> Command {
    let mut cmd = Command::cargo_bin("webidl").unwrap();
    cmd.arg("--color").arg("never");
    cmd
}

fn write_file(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn parse_reports_each_file() {
    let dir = TempDir::new().unwrap();
    let good = write_file(dir.path(), "good.webidl", "interface A {};\ndictionary D {};\n");
    webidl()
        .arg("parse")
        .arg(&good)
        .assert()
        .success()
        .stdout(contains("ok").and(contains("(2 definitions)")));
}

#[test]
fn parse_renders_syntax_errors_with_miette() {
    let dir = TempDir::new().unwrap();
    let bad = write_file(dir.path(), "bad.webidl", "interface A { undefined f(long a,); };\n");
    webidl()
        .arg("parse")
        .arg(&bad)
        .assert()
        .failure()
        .stdout(contains("FAIL"))
        .stderr(contains("webidl::syntax").and(contains("Trailing comma in arguments list")));
}

#[test]
fn parse_walks_directories_for_idl_files() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    write_file(dir.path(), "a.webidl", "interface A {};");
    write_file(&dir.path().join("nested"), "b.idl", "interface B {};");
    write_file(dir.path(), "notes.txt", "not idl at all (");
    webidl()
        .arg("parse")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(contains("a.webidl").and(contains("b.idl")).and(contains("notes.txt").not()));
}

#[test]
fn nested_typedefs_are_opt_in() {
    let dir = TempDir::new().unwrap();
    let file = write_file(dir.path(), "nested.webidl", "interface A { typedef long L; };");
    webidl().arg("parse").arg(&file).assert().failure();
    webidl()
        .arg("parse")
        .arg("--allow-nested-typedefs")
        .arg(&file)
        .assert()
        .success();
}

#[test]
fn validate_reports_rule_codes() {
    let dir = TempDir::new().unwrap();
    let file = write_file(dir.path(), "b.webidl", "interface B {};\n");
    webidl()
        .arg("validate")
        .arg(&file)
        .assert()
        .failure()
        .stdout(contains("FAIL").and(contains("1 errors, 0 warnings")))
        .stderr(contains("webidl::validation::require-exposed").and(contains("--fix")));
}

#[test]
fn validate_passes_clean_files() {
    let dir = TempDir::new().unwrap();
    let file = write_file(dir.path(), "a.webidl", "[Exposed=Window] interface A {};\n");
    webidl().arg("validate").arg(&file).assert().success();
}

#[test]
fn validate_fix_rewrites_the_file() {
    let dir = TempDir::new().unwrap();
    let file = write_file(dir.path(), "b.webidl", "// keep me\ninterface B { void f(); };\n");
    webidl().arg("validate").arg("--fix").arg(&file).assert().success();
    assert_eq!(
        fs::read_to_string(&file).unwrap(),
        "// keep me\n[Exposed=Window]\ninterface B { undefined f(); };\n"
    );
}

#[test]
fn roundtrip_confirms_identical_output() {
    let dir = TempDir::new().unwrap();
    let file = write_file(
        dir.path(),
        "a.webidl",
        "/* header */\n[Exposed=Window]\ninterface A {\n  attribute long x; // x\n};\n\n",
    );
    webidl()
        .arg("roundtrip")
        .arg(&file)
        .assert()
        .success()
        .stdout(contains("ok"));
}

#[test]
fn ast_dumps_json_and_yaml() {
    let dir = TempDir::new().unwrap();
    let file = write_file(dir.path(), "a.webidl", "interface A {};");
    webidl()
        .arg("ast")
        .arg(&file)
        .assert()
        .success()
        .stdout(contains("\"node\": \"container\"").and(contains("\"value\": \"A\"")));
    webidl()
        .arg("ast")
        .arg(&file)
        .arg("--format")
        .arg("yaml")
        .assert()
        .success()
        .stdout(contains("node: container"));
}

#[test]
fn merge_prints_the_folded_definitions() {
    let dir = TempDir::new().unwrap();
    let base = write_file(dir.path(), "base.webidl", "interface I {};\n");
    let partial = write_file(
        dir.path(),
        "partial.webidl",
        "partial interface I { attribute boolean extra; };\n",
    );
    webidl()
        .arg("merge")
        .arg(&base)
        .arg(&partial)
        .assert()
        .success()
        .stdout(contains("interface I { attribute boolean extra;};").and(contains("partial").not()));
}

#[test]
fn unreadable_input_is_a_tool_error() {
    let dir = TempDir::new().unwrap();
    webidl()
        .arg("parse")
        .arg(dir.path().join("missing.webidl"))
        .assert()
        .failure()
        .stderr(contains("webidl::io"));
}
