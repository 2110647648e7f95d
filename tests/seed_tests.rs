//! Integration tests for database seeding.

use std::path::Path;

use ask_sql::{
    executor::{CellValue, ExecutionPolicy, QueryOutcome, execute},
    seed::seed
};
use tempfile::TempDir;

fn count_rows(db: &Path, table: &str) -> i64 {
    let outcome = execute(
        db,
        &format!("SELECT COUNT(*) FROM {}", table),
        ExecutionPolicy::ReadOnly
    );
    let QueryOutcome::Rows(result) = outcome else {
        panic!("expected rows, got {:?}", outcome);
    };
    let CellValue::Integer(n) = result.rows[0][0] else {
        panic!("expected integer count");
    };
    n
}

#[test]
fn test_seed_creates_all_tables() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("test.sqlite3");
    seed(&db).unwrap();

    for table in ["sales", "products", "customers", "orders"] {
        assert_eq!(count_rows(&db, table), 5, "table {} should hold 5 rows", table);
    }
}

#[test]
fn test_seed_inserts_expected_products() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("test.sqlite3");
    seed(&db).unwrap();

    let outcome = execute(
        &db,
        "SELECT name, category, price FROM products ORDER BY id",
        ExecutionPolicy::ReadOnly
    );
    let QueryOutcome::Rows(result) = outcome else {
        panic!("expected rows, got {:?}", outcome);
    };
    assert_eq!(result.rows.len(), 5);
    assert_eq!(
        result.rows[0],
        vec![
            CellValue::Text(String::from("Laptop")),
            CellValue::Text(String::from("Electronics")),
            CellValue::Real(1000.0)
        ]
    );
    assert_eq!(
        result.rows[4],
        vec![
            CellValue::Text(String::from("Keyboard")),
            CellValue::Text(String::from("Accessories")),
            CellValue::Real(30.0)
        ]
    );
}

#[test]
fn test_seed_twice_duplicates_rows_but_not_tables() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("test.sqlite3");

    // Table creation is idempotent, row insertion deliberately is not
    seed(&db).unwrap();
    seed(&db).unwrap();

    for table in ["sales", "products", "customers", "orders"] {
        assert_eq!(
            count_rows(&db, table),
            10,
            "re-seeding should duplicate rows in {}",
            table
        );
    }
}

#[test]
fn test_seed_creates_database_file() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("fresh.sqlite3");
    assert!(!db.exists());

    seed(&db).unwrap();
    assert!(db.exists());
}
