//! Declared database schema: the prompt text and the drift check.
//!
//! The schema exists twice in this system: once as the physical SQLite
//! tables the seeder creates, and once as the instruction text sent to the
//! language model. Nothing keeps the two aligned automatically, so this
//! module is the single place both descriptions live, plus an opt-in
//! [`verify`] check that introspects the live store and reports any table
//! or column the declaration promises but the store lacks.

use std::path::Path;

use rusqlite::Connection;

use crate::error::{AppResult, db_error};

/// Instruction text sent to the model ahead of every question.
///
/// Tells the model to answer with a bare SQL statement and describes the
/// four tables it may query. Must stay textually consistent with the DDL in
/// the seeder; [`verify`] can check the live store against
/// [`DECLARED_TABLES`] on demand.
pub const SCHEMA_PROMPT: &str = "\
You are an expert in converting English questions into SQL queries to answer \
business-related questions against a SQLite database.
You have access to the following tables: sales, products, customers, and orders.
Only return the SQL query, without any additional explanation.

The **sales** table records each sale: **id** (auto-incremented integer \
primary key), **product_name** (name of the product sold), **quantity** \
(units sold), **sale_date** (date of the sale) and **total_amount** (total \
sale amount as a real number).
The **products** table lists products for sale: **id** (auto-incremented \
integer primary key), **name**, **category** and **price** (real number).
The **customers** table holds customer records: **id** (auto-incremented \
integer primary key), **name**, **email** and **join_date**.
The **orders** table records orders placed by customers: **id** \
(auto-incremented integer primary key), **customer_id** (foreign key to \
customers.id), **product_id** (foreign key to products.id), **order_date** \
and **order_amount** (real number).

Use this schema to generate SQL queries that retrieve relevant data from \
these tables based on user questions.";

/// One declared relation: table name plus ordered column names.
#[derive(Debug, Clone, Copy)]
pub struct DeclaredTable {
    pub name:    &'static str,
    pub columns: &'static [&'static str]
}

/// The four relations the prompt text promises the model.
pub const DECLARED_TABLES: &[DeclaredTable] = &[
    DeclaredTable {
        name:    "sales",
        columns: &["id", "product_name", "quantity", "sale_date", "total_amount"]
    },
    DeclaredTable {
        name:    "products",
        columns: &["id", "name", "category", "price"]
    },
    DeclaredTable {
        name:    "customers",
        columns: &["id", "name", "email", "join_date"]
    },
    DeclaredTable {
        name:    "orders",
        columns: &["id", "customer_id", "product_id", "order_date", "order_amount"]
    }
];

/// Compare the live store against [`DECLARED_TABLES`].
///
/// Returns one human-readable finding per missing table or column. An empty
/// list means the store satisfies the declaration (extra tables or columns
/// in the store are not reported; the prompt simply never mentions them).
///
/// # Errors
///
/// Returns error if the database file cannot be opened or introspected.
pub fn verify(db_path: &Path) -> AppResult<Vec<String>> {
    let conn = Connection::open(db_path)
        .map_err(|e| db_error(format!("Failed to open database: {}", e)))?;
    let mut findings = Vec::new();

    for table in DECLARED_TABLES {
        let exists: bool = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [table.name],
                |row| row.get::<_, i64>(0)
            )
            .map(|n| n > 0)
            .map_err(|e| db_error(format!("Failed to introspect database: {}", e)))?;

        if !exists {
            findings.push(format!("table '{}' is missing from the store", table.name));
            continue;
        }

        let live_columns = table_columns(&conn, table.name)?;
        for column in table.columns {
            if !live_columns.iter().any(|c| c == column) {
                findings.push(format!(
                    "column '{}.{}' is declared but missing from the store",
                    table.name, column
                ));
            }
        }
    }

    Ok(findings)
}

fn table_columns(conn: &Connection, table: &str) -> AppResult<Vec<String>> {
    // Table name comes from DECLARED_TABLES, never from user input
    let sql = format!("PRAGMA table_info('{}')", table);
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| db_error(format!("Failed to introspect table '{}': {}", table, e)))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .map_err(|e| db_error(format!("Failed to introspect table '{}': {}", table, e)))?
        .collect::<Result<Vec<String>, _>>()
        .map_err(|e| db_error(format!("Failed to introspect table '{}': {}", table, e)))?;
    Ok(columns)
}
