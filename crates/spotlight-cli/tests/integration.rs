#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn spotlight(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("spotlight").unwrap();
    cmd.current_dir(dir.path())
        .env("SPOTLIGHT_ROOT", dir.path())
        .env_remove("RUST_LOG");
    cmd
}

fn init_project(dir: &TempDir) {
    spotlight(dir).arg("init").assert().success();
}

fn json_output(dir: &TempDir, args: &[&str]) -> serde_json::Value {
    let out = spotlight(dir)
        .args(args)
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    serde_json::from_slice(&out).unwrap()
}

fn add_products(dir: &TempDir, names: &[&str], featured: bool) {
    for name in names {
        let mut cmd = spotlight(dir);
        cmd.args(["product", "add", name]);
        if featured {
            cmd.arg("--featured");
        }
        cmd.assert().success();
    }
}

// ---------------------------------------------------------------------------
// spotlight init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_config_databases_and_schedule() {
    let dir = TempDir::new().unwrap();
    spotlight(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("spotlight initialized"));

    assert!(dir.path().join(".spotlight/config.yaml").exists());
    assert!(dir.path().join(".spotlight/catalog.db").exists());
    assert!(dir.path().join(".spotlight/spotlight.redb").exists());

    let config = std::fs::read_to_string(dir.path().join(".spotlight/config.yaml")).unwrap();
    assert!(config.contains("admin_token:"));
    assert!(config.contains("batch_size: 10"));

    let status = json_output(&dir, &["status"]);
    assert_eq!(status["schedule"]["hook"], "spotlight_daily_rotation");
}

#[test]
fn init_is_idempotent_and_keeps_token() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let first = std::fs::read_to_string(dir.path().join(".spotlight/config.yaml")).unwrap();
    init_project(&dir);
    let second = std::fs::read_to_string(dir.path().join(".spotlight/config.yaml")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn commands_before_init_fail() {
    let dir = TempDir::new().unwrap();
    spotlight(&dir)
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}

// ---------------------------------------------------------------------------
// spotlight activate / deactivate
// ---------------------------------------------------------------------------

#[test]
fn activate_twice_keeps_one_registration() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let again = json_output(&dir, &["activate"]);
    assert_eq!(again["registered"], false);
    assert_eq!(again["schedule"]["hook"], "spotlight_daily_rotation");
}

#[test]
fn deactivate_then_reactivate() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let removed = json_output(&dir, &["deactivate"]);
    assert_eq!(removed["removed"], true);
    let status = json_output(&dir, &["status"]);
    assert!(status["schedule"].is_null());

    spotlight(&dir)
        .arg("deactivate")
        .assert()
        .success()
        .stdout(predicate::str::contains("was not registered"));

    let registered = json_output(&dir, &["activate"]);
    assert_eq!(registered["registered"], true);
}

/// Kills the wrapped `spotlight serve` process on drop.
struct Server(std::process::Child);

impl Drop for Server {
    fn drop(&mut self) {
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}

fn start_server(dir: &TempDir) -> Server {
    use std::io::{BufRead, BufReader};
    use std::process::Stdio;

    let mut child = std::process::Command::new(assert_cmd::cargo::cargo_bin("spotlight"))
        .args(["serve", "--port", "0"])
        .current_dir(dir.path())
        .env("SPOTLIGHT_ROOT", dir.path())
        .env_remove("RUST_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();
    let stdout = child.stdout.take().unwrap();
    let mut line = String::new();
    BufReader::new(stdout).read_line(&mut line).unwrap();
    assert!(line.contains("Admin page"), "unexpected serve output: {line}");
    Server(child)
}

#[test]
fn schedule_commands_work_while_serving() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let _server = start_server(&dir);

    let removed = json_output(&dir, &["deactivate"]);
    assert_eq!(removed["removed"], true);
    let status = json_output(&dir, &["status"]);
    assert!(status["schedule"].is_null());

    let registered = json_output(&dir, &["activate"]);
    assert_eq!(registered["registered"], true);
    spotlight(&dir).arg("run").assert().success();
}

// ---------------------------------------------------------------------------
// spotlight run
// ---------------------------------------------------------------------------

#[test]
fn run_rotates_small_pools_entirely() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    add_products(&dir, &["Old A", "Old B", "Old C"], true);
    add_products(&dir, &["New 1", "New 2", "New 3", "New 4", "New 5"], false);

    let report = json_output(&dir, &["run"]);
    assert_eq!(report["unfeatured"].as_array().unwrap().len(), 3);
    assert_eq!(report["featured"].as_array().unwrap().len(), 5);
    assert_eq!(report["titles"].as_array().unwrap().len(), 5);

    let status = json_output(&dir, &["status"]);
    assert_eq!(status["last_run"]["titles"].as_array().unwrap().len(), 5);
    assert_eq!(status["last_run"]["trigger"], "manual");

    let featured = json_output(&dir, &["product", "list", "--featured"]);
    let names: Vec<&str> = featured
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 5);
    assert!(names.iter().all(|n| n.starts_with("New")));
}

#[test]
fn run_on_empty_catalog_is_noop() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    spotlight(&dir)
        .arg("run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Unfeatured 0 product(s), featured 0 product(s)."));

    let status = json_output(&dir, &["status"]);
    assert_eq!(status["last_run"]["titles"], serde_json::json!([]));
}

#[test]
fn run_respects_batch_size() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let path = dir.path().join(".spotlight/config.yaml");
    let config = std::fs::read_to_string(&path).unwrap();
    std::fs::write(&path, config.replace("batch_size: 10", "batch_size: 2")).unwrap();
    add_products(&dir, &["F1", "F2", "F3"], true);
    add_products(&dir, &["U1", "U2", "U3", "U4"], false);

    let report = json_output(&dir, &["run"]);
    assert_eq!(report["unfeatured"].as_array().unwrap().len(), 2);
    assert_eq!(report["featured"].as_array().unwrap().len(), 2);
}

// ---------------------------------------------------------------------------
// spotlight status / product
// ---------------------------------------------------------------------------

#[test]
fn status_before_any_run_shows_placeholder() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    spotlight(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Last run:  never"))
        .stdout(predicate::str::contains(
            "No products have been marked as featured yet.",
        ));
}

#[test]
fn product_add_list_remove() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let added = json_output(&dir, &["product", "add", "Walnut Desk"]);
    let id = added["id"].as_i64().unwrap();
    assert_eq!(added["featured"], false);

    spotlight(&dir)
        .args(["product", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Walnut Desk"));

    spotlight(&dir)
        .args(["product", "remove", &id.to_string()])
        .assert()
        .success();
    spotlight(&dir)
        .args(["product", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No products."));
}

#[test]
fn product_remove_missing_fails() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    spotlight(&dir)
        .args(["product", "remove", "999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("product not found: 999"));
}

#[test]
fn product_add_blank_name_fails() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    spotlight(&dir)
        .args(["product", "add", "  "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid product name"));
}
