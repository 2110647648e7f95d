//! One-time database seeding: schema creation plus sample data.
//!
//! Creates the four demo tables and inserts five illustrative rows into
//! each, all inside one transaction. Table creation is guarded by
//! `IF NOT EXISTS` and can run any number of times; row insertion has no
//! such guard, so running the seeder twice doubles every table's contents.
//! That asymmetry is inherited behavior and tests pin it down rather than
//! paper over it.

use std::path::Path;

use rusqlite::{Connection, params};

use crate::error::{AppResult, db_error};

const CREATE_TABLES: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS sales (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        product_name TEXT,
        quantity INTEGER,
        sale_date TEXT,
        total_amount REAL
    )",
    "CREATE TABLE IF NOT EXISTS products (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT,
        category TEXT,
        price REAL
    )",
    "CREATE TABLE IF NOT EXISTS customers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT,
        email TEXT,
        join_date TEXT
    )",
    "CREATE TABLE IF NOT EXISTS orders (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        customer_id INTEGER,
        product_id INTEGER,
        order_date TEXT,
        order_amount REAL,
        FOREIGN KEY (customer_id) REFERENCES customers (id),
        FOREIGN KEY (product_id) REFERENCES products (id)
    )"
];

const SALES: &[(&str, i64, &str, f64)] = &[
    ("Laptop", 5, "2024-09-01", 5000.00),
    ("Smartphone", 10, "2024-09-02", 3000.00),
    ("Headphones", 20, "2024-09-03", 1000.00),
    ("Monitor", 8, "2024-09-04", 1600.00),
    ("Keyboard", 15, "2024-09-05", 450.00)
];

const PRODUCTS: &[(&str, &str, f64)] = &[
    ("Laptop", "Electronics", 1000.00),
    ("Smartphone", "Electronics", 300.00),
    ("Headphones", "Accessories", 50.00),
    ("Monitor", "Electronics", 200.00),
    ("Keyboard", "Accessories", 30.00)
];

const CUSTOMERS: &[(&str, &str, &str)] = &[
    ("Alice Johnson", "alice.johnson@example.com", "2024-01-15"),
    ("Bob Smith", "bob.smith@example.com", "2024-03-22"),
    ("Carol Davis", "carol.davis@example.com", "2024-05-10"),
    ("David Brown", "david.brown@example.com", "2024-07-01"),
    ("Emily White", "emily.white@example.com", "2024-08-20")
];

const ORDERS: &[(i64, i64, &str, f64)] = &[
    (1, 1, "2024-09-01", 1000.00),
    (2, 2, "2024-09-02", 300.00),
    (3, 3, "2024-09-03", 50.00),
    (4, 4, "2024-09-04", 200.00),
    (5, 5, "2024-09-05", 30.00)
];

/// Create the demo tables and insert the sample rows.
///
/// Runs inside one transaction: either every statement lands or none do.
///
/// # Errors
///
/// Returns error if the database cannot be opened or any statement fails;
/// the transaction rolls back on the error path.
pub fn seed(db_path: &Path) -> AppResult<()> {
    let mut conn = Connection::open(db_path)
        .map_err(|e| db_error(format!("Failed to open database: {}", e)))?;
    let tx = conn
        .transaction()
        .map_err(|e| db_error(format!("Failed to start transaction: {}", e)))?;

    for ddl in CREATE_TABLES {
        tx.execute(ddl, [])
            .map_err(|e| db_error(format!("Failed to create table: {}", e)))?;
    }

    for (product_name, quantity, sale_date, total_amount) in SALES {
        tx.execute(
            "INSERT INTO sales (product_name, quantity, sale_date, total_amount) \
             VALUES (?1, ?2, ?3, ?4)",
            params![product_name, quantity, sale_date, total_amount]
        )
        .map_err(|e| db_error(format!("Failed to insert sales row: {}", e)))?;
    }

    for (name, category, price) in PRODUCTS {
        tx.execute(
            "INSERT INTO products (name, category, price) VALUES (?1, ?2, ?3)",
            params![name, category, price]
        )
        .map_err(|e| db_error(format!("Failed to insert products row: {}", e)))?;
    }

    for (name, email, join_date) in CUSTOMERS {
        tx.execute(
            "INSERT INTO customers (name, email, join_date) VALUES (?1, ?2, ?3)",
            params![name, email, join_date]
        )
        .map_err(|e| db_error(format!("Failed to insert customers row: {}", e)))?;
    }

    for (customer_id, product_id, order_date, order_amount) in ORDERS {
        tx.execute(
            "INSERT INTO orders (customer_id, product_id, order_date, order_amount) \
             VALUES (?1, ?2, ?3, ?4)",
            params![customer_id, product_id, order_date, order_amount]
        )
        .map_err(|e| db_error(format!("Failed to insert orders row: {}", e)))?;
    }

    tx.commit()
        .map_err(|e| db_error(format!("Failed to commit seed transaction: {}", e)))
}
