//! Integration tests for the ask-sql binary.

use assert_cmd::{Command, cargo::cargo_bin_cmd};
use predicates::prelude::*;
use tempfile::TempDir;

fn cmd() -> Command {
    let mut c = cargo_bin_cmd!("ask-sql");
    c.env_remove("LLM_API_KEY");
    c.env_remove("LLM_PROVIDER");
    c.env_remove("ASK_SQL_DB");
    c
}

#[test]
fn test_seed_then_query() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("demo.sqlite3");
    let db_arg = db.to_str().unwrap();

    cmd()
        .args(["seed", "--db", db_arg])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tables created"));

    cmd()
        .args([
            "query",
            "SELECT name, price FROM products WHERE category = 'Accessories'",
            "--db",
            db_arg,
            "--no-color"
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Headphones"))
        .stdout(predicate::str::contains("Keyboard"));
}

#[test]
fn test_query_invalid_sql_exits_2_with_error_text() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("demo.sqlite3");
    let db_arg = db.to_str().unwrap();

    cmd().args(["seed", "--db", db_arg]).assert().success();

    cmd()
        .args(["query", "SELEC * FROM sales", "--db", db_arg, "--no-color"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Error executing query"))
        .stdout(predicate::str::contains("SELEC * FROM sales"));
}

#[test]
fn test_query_zero_rows_reports_no_results() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("demo.sqlite3");
    let db_arg = db.to_str().unwrap();

    cmd().args(["seed", "--db", db_arg]).assert().success();

    cmd()
        .args([
            "query",
            "SELECT * FROM customers WHERE join_date > '2024-12-31'",
            "--db",
            db_arg,
            "--no-color"
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("No results found."));
}

#[test]
fn test_query_read_only_rejects_delete() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("demo.sqlite3");
    let db_arg = db.to_str().unwrap();

    cmd().args(["seed", "--db", db_arg]).assert().success();

    cmd()
        .args([
            "query",
            "DELETE FROM sales",
            "--db",
            db_arg,
            "--read-only",
            "--no-color"
        ])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("read-only"));

    cmd()
        .args(["query", "SELECT COUNT(*) FROM sales", "--db", db_arg, "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("5"));
}

#[test]
fn test_seed_twice_duplicates_rows() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("demo.sqlite3");
    let db_arg = db.to_str().unwrap();

    cmd().args(["seed", "--db", db_arg]).assert().success();
    cmd().args(["seed", "--db", db_arg]).assert().success();

    cmd()
        .args(["query", "SELECT COUNT(*) FROM products", "--db", db_arg, "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("10"));
}

#[test]
fn test_ask_without_api_key_fails_before_any_work() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("demo.sqlite3");

    cmd()
        .args([
            "ask",
            "How many sales were made?",
            "--db",
            db.to_str().unwrap(),
            "--no-color"
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("API key required"));

    // Provider validation happens before the database is touched
    assert!(!db.exists());
}

#[test]
fn test_ask_provider_from_env_is_honored() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("demo.sqlite3");

    cmd()
        .env("LLM_PROVIDER", "openai")
        .args([
            "ask",
            "How many sales were made?",
            "--db",
            db.to_str().unwrap(),
            "--no-color"
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("API key required for OpenAI"));
}

#[test]
fn test_ask_check_schema_without_api_key_leaves_store_untouched() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("demo.sqlite3");

    cmd()
        .args([
            "ask",
            "How many sales were made?",
            "--db",
            db.to_str().unwrap(),
            "--check-schema",
            "--no-color"
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("API key required"));

    assert!(!db.exists());
}

#[test]
fn test_ask_dry_run_prints_prompt_without_credentials() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("demo.sqlite3");

    cmd()
        .args([
            "ask",
            "How many sales were made?",
            "--db",
            db.to_str().unwrap(),
            "--dry-run",
            "--no-color"
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("DRY RUN"))
        .stdout(predicate::str::contains("sales, products, customers, and orders"))
        .stdout(predicate::str::contains("How many sales were made?"));
}

#[test]
fn test_query_json_output() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("demo.sqlite3");
    let db_arg = db.to_str().unwrap();

    cmd().args(["seed", "--db", db_arg]).assert().success();

    cmd()
        .args([
            "query",
            "SELECT name FROM products WHERE category = 'Accessories'",
            "--db",
            db_arg,
            "-f",
            "json"
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"Headphones\""));
}
