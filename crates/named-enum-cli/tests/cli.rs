//! Drives the `named-enum` binary against definition files on disk.

use std::{io::Write, process::Command};

use tempfile::NamedTempFile;

const BIN: &str = env!("CARGO_BIN_EXE_named-enum");

fn definitions(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(json.as_bytes()).expect("write definitions");
    file
}

const LEGENDS: &str = r#"{
  "enums": [
    {
      "name": "NBALegendary",
      "extends": "LabeledEnum",
      "members": {
        "JOHNSON": ["Johnson", "Magic Johnson"],
        "JORDAN": ["Jordan", "Air Jordan"]
      }
    },
    {
      "name": "Color",
      "members": { "RED": 1, "GREEN": 2 }
    }
  ]
}"#;

/// Every class in the document is described, in document order.
#[test]
fn describes_every_enum() {
    let file = definitions(LEGENDS);
    let output = Command::new(BIN).arg(file.path()).output().expect("run binary");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8(output.stdout).expect("utf-8 output");
    assert_eq!(
        stdout,
        "Class: NBALegendary\n\
         \x20  Name |     Key |         Label\n\
         ---------------------------------\n\
         JOHNSON | Johnson | Magic Johnson\n\
         \x20JORDAN |  Jordan |    Air Jordan\n\
         \n\
         Class: Color\n\
         \x20Name | Value\n\
         -------------\n\
         \x20\x20RED |     1\n\
         GREEN |     2\n\
         \n"
    );
}

/// `--enum` restricts the output to one class.
#[test]
fn describes_selected_enum() {
    let file = definitions(LEGENDS);
    let output = Command::new(BIN)
        .arg(file.path())
        .args(["--enum", "Color"])
        .output()
        .expect("run binary");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf-8 output");
    assert!(stdout.starts_with("Class: Color\n"), "got: {stdout}");
    assert!(!stdout.contains("NBALegendary"));
}

/// Build errors are reported on stderr with a failing exit status.
#[test]
fn reports_reserved_field() {
    let file = definitions(r#"{"enums": [{"name": "Bad", "fields": ["key", "name"], "members": {}}]}"#);
    let output = Command::new(BIN).arg(file.path()).output().expect("run binary");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("ConfigurationError: 'name' or 'value' cannot be attributes"),
        "got: {stderr}"
    );
}

/// A missing file and a missing argument both fail cleanly.
#[test]
fn rejects_bad_invocations() {
    let output = Command::new(BIN).output().expect("run binary");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing definitions file"));

    let output = Command::new(BIN).arg("/definitely/not/here.json").output().expect("run binary");
    assert!(!output.status.success());
}

/// `--trace` logs construction events to stderr without changing stdout.
#[test]
fn trace_logs_to_stderr() {
    let file = definitions(LEGENDS);
    let output = Command::new(BIN)
        .arg(file.path())
        .arg("--trace")
        .env("RUST_LOG", "named_enum=debug")
        .output()
        .expect("run binary");
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("class finalized"), "got: {stderr}");
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("Class: NBALegendary\n"));
}
