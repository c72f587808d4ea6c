//! End-to-end tests that drive the `stockroom` binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const INIT_SQL: &str = "\
-- seed
INSERT INTO Items (Id, Name, Description, Img) VALUES (1, 'Scalpel', 'blade', 'a.png');
CREATE TABLE ignored (id int);
INSERT INTO Units (Id, Name, Img, ItemId)
VALUES (10, 'Single', 's.png', 1);
";

fn stockroom(project: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_stockroom"))
        .arg("--project-dir")
        .arg(project)
        .args(args)
        .env("STOCKROOM_LOG", "warn")
        .env_remove("STOCKROOM_DATABASE")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn project_with_seed() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("Data")).unwrap();
    fs::write(dir.path().join("Data/init.sql"), INIT_SQL).unwrap();
    dir
}

#[test]
fn parse_lists_statements() {
    let dir = project_with_seed();

    let output = stockroom(dir.path(), &["parse", "--json"]);

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let statements = json["statements"].as_array().unwrap();
    assert_eq!(statements.len(), 2);
    assert_eq!(statements[0]["start_line"], 2);
    assert_eq!(statements[1]["start_line"], 4);
    assert!(json["anomalies"].as_array().unwrap().is_empty());
}

#[test]
fn init_then_status_reports_seeded_store() {
    let dir = project_with_seed();

    let init = stockroom(dir.path(), &["init", "--json"]);
    assert!(init.status.success());
    let report: serde_json::Value = serde_json::from_str(&stdout(&init)).unwrap();
    assert_eq!(report["schema_after"], "Present");
    assert_eq!(report["seed"]["state"], "loaded");
    assert_eq!(report["seed"]["items"], 1);
    assert!(dir.path().join("stockroom.duckdb").exists());

    let again = stockroom(dir.path(), &["init", "--json"]);
    let report: serde_json::Value = serde_json::from_str(&stdout(&again)).unwrap();
    assert_eq!(report["seed"]["state"], "already_seeded");

    let status = stockroom(dir.path(), &["status", "--json"]);
    assert!(status.status.success());
    let status: serde_json::Value = serde_json::from_str(&stdout(&status)).unwrap();
    assert_eq!(status["schema"], "present");
    assert_eq!(status["tables"]["Items"], 1);
    assert_eq!(status["tables"]["Units"], 1);
    assert_eq!(
        status["ledger"][0]["migration_id"],
        "20250508095936_InitialCreate"
    );
}

#[test]
fn init_without_script_still_succeeds() {
    let dir = tempfile::tempdir().unwrap();

    let output = stockroom(dir.path(), &["init"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("Seed: failed"));
}

#[test]
fn repair_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();

    let first = stockroom(dir.path(), &["repair"]);
    assert!(first.status.success());
    assert!(stdout(&first).contains("Created migration ledger table"));

    let second = stockroom(dir.path(), &["repair"]);
    assert!(second.status.success());
    assert!(stdout(&second).contains("already recorded"));
}

#[test]
fn status_without_store_does_not_create_one() {
    let dir = tempfile::tempdir().unwrap();

    let output = stockroom(dir.path(), &["status"]);

    assert!(output.status.success());
    assert!(!dir.path().join("stockroom.duckdb").exists());
}

#[test]
fn repair_rejects_overlong_migration_id() {
    let dir = tempfile::tempdir().unwrap();
    let migration = "m".repeat(151);

    let output = stockroom(dir.path(), &["repair", "--migration", &migration]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ledger.baseline_migration"));
    assert!(!dir.path().join("stockroom.duckdb").exists());
}
