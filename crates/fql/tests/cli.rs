//! End-to-end tests driving the `fql` binary.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

const SCHEMA: &str = r#"
[properties.name]
type = "text"
operators = ["=", "LIKE"]

[properties.age]
type = "integer"
"#;

const REQUEST: &str = r#"{
    "filters": {
        "jNames": {"ref": "name", "operator": "LIKE", "value": "J%"},
        "adult": {"ref": "age", "operator": ">=", "value": 18}
    },
    "combineWith": "jNames & !adult"
}"#;

const DATA: &str = r#"[
    {"name": "Jane", "age": 30},
    {"name": "Jack", "age": 12},
    {"name": "Mia", "age": 9}
]"#;

/// A sandbox directory with schema, request and data files.
struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let dir = TempDir::new().expect("failed to create sandbox");
        let sandbox = Self { dir };
        sandbox.write("schema.toml", SCHEMA);
        sandbox.write("request.json", REQUEST);
        sandbox.write("data.json", DATA);
        sandbox
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, contents: &str) {
        fs::write(self.path(name), contents).expect("failed to write sandbox file");
    }

    fn arg(&self, name: &str) -> String {
        self.path(name).display().to_string()
    }
}

fn fql(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fql"))
        .args(args)
        .env_remove("FQL_LOG")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run fql")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stderr).expect("stderr should be JSON")
}

#[test]
fn test_parse_prints_canonical_form() {
    let output = fql(&["parse", "!a & b | c", "--no-color"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "((!a & b) | c)\nkeys: a, b, c\n");
}

#[test]
fn test_tokens_json() {
    let output = fql(&["tokens", "a&b", "--json"]);
    assert!(output.status.success());

    let tokens: Value = serde_json::from_slice(&output.stdout).unwrap();
    let kinds: Vec<&str> = tokens
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["IDENT", "AND", "IDENT"]);
}

#[test]
fn test_syntax_error_exit_code() {
    let output = fql(&["parse", "(a & b", "--json"]);
    assert_eq!(output.status.code(), Some(1));

    let error = stderr_json(&output);
    assert_eq!(error["error"]["code"], "SYNTAX_ERROR");
}

#[test]
fn test_invalid_character_text_error() {
    let output = fql(&["parse", "a $ b"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("Error: "), "{stderr}");
    assert!(stderr.contains('$'), "{stderr}");
}

#[test]
fn test_eval_filters_records() {
    let sandbox = Sandbox::new();
    let output = fql(&[
        "eval",
        "--schema",
        &sandbox.arg("schema.toml"),
        "--request",
        &sandbox.arg("request.json"),
        "--data",
        &sandbox.arg("data.json"),
        "--json",
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let result: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["matched"], 1);
    assert_eq!(result["total"], 3);
    assert_eq!(result["records"][0]["name"], "Jack");
}

#[test]
fn test_sql_sqlite_dialect() {
    let sandbox = Sandbox::new();
    let output = fql(&[
        "sql",
        "-s",
        &sandbox.arg("schema.toml"),
        "-r",
        &sandbox.arg("request.json"),
        "--dialect",
        "sqlite",
        "--no-color",
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        stdout(&output),
        "(\"name\" LIKE ? AND NOT (\"age\" >= ?))\n  1: \"J%\"\n  2: 18\n"
    );
}

#[test]
fn test_unsupported_operator_is_validation_error() {
    let sandbox = Sandbox::new();
    sandbox.write(
        "request.json",
        r#"{"filters": {"n": {"ref": "name", "operator": ">", "value": "M"}}, "combineWith": "n"}"#,
    );

    let output = fql(&[
        "sql",
        "-s",
        &sandbox.arg("schema.toml"),
        "-r",
        &sandbox.arg("request.json"),
        "--json",
    ]);
    assert_eq!(output.status.code(), Some(2));

    let error = stderr_json(&output);
    assert_eq!(error["error"]["code"], "VALIDATION_ERROR");
    assert!(error["error"]["message"]
        .as_str()
        .unwrap()
        .starts_with("invalid filter 'n'"));
}

#[test]
fn test_syntax_error_wins_over_unknown_property() {
    let sandbox = Sandbox::new();
    sandbox.write(
        "request.json",
        r#"{"filters": {"a": {"ref": "agee", "operator": "=", "value": 1}}, "combineWith": "a &"}"#,
    );

    let output = fql(&[
        "eval",
        "-s",
        &sandbox.arg("schema.toml"),
        "-r",
        &sandbox.arg("request.json"),
        "-d",
        &sandbox.arg("data.json"),
        "--json",
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stderr_json(&output)["error"]["code"], "SYNTAX_ERROR");
}

#[test]
fn test_deep_expression_is_syntax_error() {
    let output = fql(&["parse", &format!("{}a", "!".repeat(20_000))]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_bad_schema_is_config_error() {
    let sandbox = Sandbox::new();
    sandbox.write("schema.toml", "[properties.name]\ntype = \"colour\"\n");

    let output = fql(&[
        "sql",
        "-s",
        &sandbox.arg("schema.toml"),
        "-r",
        &sandbox.arg("request.json"),
    ]);
    assert_eq!(output.status.code(), Some(5));
}

#[test]
fn test_missing_file_is_io_error() {
    let sandbox = Sandbox::new();
    let output = fql(&[
        "sql",
        "-s",
        &sandbox.arg("missing.toml"),
        "-r",
        &sandbox.arg("request.json"),
    ]);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_quiet_suppresses_output() {
    let output = fql(&["parse", "a | b", "--quiet"]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}
