use std::fs;

use assert_cmd::Command;
use assert_cmd::assert::{Assert, OutputAssertExt};
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const VALID_CONFIG: &str = r#"
backend:
  name: git-gateway
collections:
  - name: blog
    fields:
      - { name: title, widget: string }
      - { name: body, widget: markdown }
"#;

fn cms_smoke() -> Command {
    Command::new(env!("CARGO_BIN_EXE_cms-smoke"))
}

async fn healthy_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Hello World"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/status"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "1", "client_name": "test_client"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/admin/index.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>admin</html>"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/admin/config.yml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(VALID_CONFIG))
        .mount(&server)
        .await;
    server
}

async fn run_blocking(mut cmd: Command) -> Assert {
    let output = tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap();
    output.assert()
}

#[tokio::test(flavor = "multi_thread")]
async fn all_checks_pass_exits_zero() {
    let server = healthy_server().await;

    let mut cmd = cms_smoke();
    cmd.args(["run", "--base-url", &server.uri()]);
    run_blocking(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("Tests passed: 5/5"))
        .stdout(predicate::str::contains("API Root Response"));
}

#[tokio::test(flavor = "multi_thread")]
async fn base_url_read_from_env_file() {
    let server = healthy_server().await;
    let dir = tempfile::tempdir().unwrap();
    let env_file = dir.path().join(".env");
    fs::write(
        &env_file,
        format!("WDS_SOCKET_PORT=443\nREACT_APP_BACKEND_URL=\"{}\"\n", server.uri()),
    )
    .unwrap();

    let mut cmd = cms_smoke();
    cmd.args(["run", "--env-file", env_file.to_str().unwrap(), "--group", "backend"]);
    run_blocking(cmd)
        .await
        .success()
        .stdout(predicate::str::contains(format!("Testing backend API at: {}", server.uri())))
        .stdout(predicate::str::contains("Tests passed: 3/3"));
}

#[tokio::test(flavor = "multi_thread")]
async fn create_status_returning_201_exits_one() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "1"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let mut cmd = cms_smoke();
    cmd.args(["run", "--base-url", &server.uri(), "--group", "backend"]);
    run_blocking(cmd)
        .await
        .code(1)
        .stdout(predicate::str::contains("[FAIL]"))
        .stdout(predicate::str::contains("Expected 200, got 201"))
        .stdout(predicate::str::contains("Tests passed: 2/3"));
}

#[tokio::test(flavor = "multi_thread")]
async fn duplicate_config_fields_fail_the_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/index.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/admin/config.yml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "collections:\n  - name: blog\n    fields:\n      - {name: title}\n      - {name: title}\n",
        ))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let report_path = dir.path().join("report.json");

    let mut cmd = cms_smoke();
    cmd.args([
        "run",
        "--base-url",
        &server.uri(),
        "--group",
        "frontend",
        "--json",
        report_path.to_str().unwrap(),
    ]);
    run_blocking(cmd)
        .await
        .code(1)
        .stdout(predicate::str::contains("Duplicate field names: title"));

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["success"], false);
    assert_eq!(report["checks_run"], 2);
    assert_eq!(report["checks_passed"], 2);
    assert_eq!(report["groups"][0]["checks"][1]["outcome"], "validation");
    assert_eq!(report["groups"][0]["checks"][1]["payload"], json!({"error": ["title"]}));
}

#[test]
fn missing_env_key_is_a_setup_error() {
    let dir = tempfile::tempdir().unwrap();
    let env_file = dir.path().join(".env");
    fs::write(&env_file, "OTHER=1\n").unwrap();

    cms_smoke()
        .args(["run", "--env-file", env_file.to_str().unwrap()])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No REACT_APP_BACKEND_URL= entry"));
}

#[test]
fn unreachable_backend_exits_one() {
    cms_smoke()
        .args(["run", "--base-url", "http://127.0.0.1:1", "--group", "backend"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Tests passed: 0/3"))
        .stdout(predicate::str::contains("refused").or(predicate::str::contains("Refused")));
}

#[test]
fn progress_lines_written_to_piped_stderr() {
    cms_smoke()
        .args(["run", "--base-url", "http://127.0.0.1:1", "--group", "backend"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Testing API Root Endpoint..."))
        .stderr(predicate::str::contains("✗ API Root Endpoint - Error:"))
        .stderr(predicate::str::contains("Testing Create Status Check..."));
}

#[tokio::test(flavor = "multi_thread")]
async fn repeated_group_runs_once() {
    let server = healthy_server().await;

    let mut cmd = cms_smoke();
    cmd.args([
        "run",
        "--base-url",
        &server.uri(),
        "--group",
        "backend",
        "--group",
        "backend",
    ]);
    run_blocking(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("Tests passed: 3/3"))
        .stderr(predicate::str::contains("✓ API Root Endpoint - Status: 200"));
}

#[test]
fn validate_config_accepts_valid_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("config.yml");
    fs::write(&file, VALID_CONFIG).unwrap();

    cms_smoke()
        .args(["validate-config", file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 collections, 2 fields"));
}

#[test]
fn validate_config_scope_controls_cross_collection_names() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("config.yml");
    fs::write(
        &file,
        "collections:\n  - name: a\n    fields: [{name: title}]\n  - name: b\n    fields: [{name: title}]\n",
    )
    .unwrap();

    cms_smoke()
        .args(["validate-config", file.to_str().unwrap()])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("duplicate field names: title"));

    cms_smoke()
        .args([
            "validate-config",
            file.to_str().unwrap(),
            "--duplicate-scope",
            "per-collection",
        ])
        .assert()
        .success();
}

#[test]
fn validate_config_missing_file_exits_two() {
    cms_smoke()
        .args(["validate-config", "/nonexistent/config.yml"])
        .assert()
        .code(2);
}
