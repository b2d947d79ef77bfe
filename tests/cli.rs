mod common;

use assert_cmd::Command;
use common::{TestWorkspace, fixture_path};
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

fn row_decoder() -> Command {
    Command::cargo_bin("row-decoder").expect("binary exists")
}

#[test]
fn columns_prints_transformed_names() {
    row_decoder()
        .args(["columns", "userId", "HTTPServer", "id"])
        .assert()
        .success()
        .stdout(contains("user_id"))
        .stdout(contains("http_server"))
        .stdout(contains("field"));
}

#[test]
fn columns_honours_convention() {
    row_decoder()
        .args(["columns", "userId", "--convention", "kebab"])
        .assert()
        .success()
        .stdout(contains("user-id"));
}

#[test]
fn dump_renders_fixture_rows() {
    let path = fixture_path("people.yaml");
    row_decoder()
        .args(["dump", "--rows", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("user_id (bigint)"))
        .stdout(contains("'Alice'"))
        .stdout(contains("null"));
}

#[test]
fn check_passes_when_nullable_fields_are_optional() {
    let path = fixture_path("people.yaml");
    row_decoder()
        .args([
            "check",
            "--rows",
            path.to_str().unwrap(),
            "--fields",
            "userId,displayName,nickName?,tags",
        ])
        .assert()
        .success()
        .stdout(contains("2 row(s) decoded"));
}

#[test]
fn check_reports_unexpected_null_with_location() {
    let path = fixture_path("people.yaml");
    row_decoder()
        .args([
            "check",
            "--rows",
            path.to_str().unwrap(),
            "--fields",
            "userId,nickName",
        ])
        .assert()
        .failure()
        .stdout(contains("row 2").and(contains("crm.people.nick_name")))
        .stderr(contains("1 of 2 row(s) failed to decode"));
}

#[test]
fn check_reports_missing_columns() {
    let workspace = TestWorkspace::new();
    let path = workspace.write(
        "orders.json",
        r#"{
  "keyspace": "shop",
  "table": "orders",
  "columns": [{ "name": "id", "type": "int" }],
  "rows": [[1]]
}"#,
    );
    row_decoder()
        .args([
            "check",
            "--rows",
            path.to_str().unwrap(),
            "--fields",
            "id,placedAt",
        ])
        .assert()
        .failure()
        .stdout(contains("no column 'placed_at'"));
}

#[test]
fn dump_rejects_malformed_fixture() {
    let workspace = TestWorkspace::new();
    let path = workspace.write(
        "bad.yaml",
        "keyspace: k\ntable: t\ncolumns:\n  - { name: n, type: int }\nrows:\n  - [nope]\n",
    );
    row_decoder()
        .args(["dump", "--rows", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("Row 1 column 'n'"));
}
