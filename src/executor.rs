//! Query execution against the local SQLite store.
//!
//! Each call opens a fresh connection, runs exactly one statement, eagerly
//! collects every row, and drops the connection before returning on every
//! path. Engine-level failures are not raised: they collapse into the
//! [`QueryOutcome::Error`] variant and come back as data, so the caller can
//! render the generated SQL alongside the error text. A successful
//! statement that matches no rows is a [`QueryOutcome::Rows`] with an empty
//! row list, which is a different thing from an error and must be rendered
//! differently.
//!
//! # Statement policy
//!
//! By default any statement the model produced runs unrestricted, mutating
//! statements included; that is the original contract of this pipeline.
//! [`ExecutionPolicy::ReadOnly`] is the opt-in hardening: it rejects
//! statements whose first keyword is not a read-only one before anything
//! touches the database.

use std::path::Path;

use rusqlite::{Connection, types::Value};
use serde::Serialize;

/// Whether mutating statements are allowed to reach the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionPolicy {
    /// Run whatever was generated, the original pass-through contract
    #[default]
    Unrestricted,
    /// Reject statements that do not start with a read-only keyword
    ReadOnly
}

/// One cell of a result row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>)
}

impl From<Value> for CellValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Integer(i) => Self::Integer(i),
            Value::Real(r) => Self::Real(r),
            Value::Text(t) => Self::Text(t),
            Value::Blob(b) => Self::Blob(b)
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Real(r) => write!(f, "{}", r),
            Self::Text(t) => write!(f, "{}", t),
            Self::Blob(b) => write!(f, "<{} byte blob>", b.len())
        }
    }
}

/// Ordered column names plus ordered row tuples from one execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows:    Vec<Vec<CellValue>>
}

/// Terminal outcome of one execute call.
///
/// Exactly two shapes: a result set (possibly with zero rows), or the
/// engine's error text. There is no intermediate or retry state.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Rows(ResultSet),
    Error(String)
}

/// Execute one SQL statement against the database at `db_path`.
///
/// The connection lives strictly inside this call: opened here, dropped
/// here, on the success and the error path alike. All rows are fetched
/// eagerly with no limit; adequate for the small illustrative dataset this
/// store holds, not for anything larger.
pub fn execute(db_path: &Path, sql: &str, policy: ExecutionPolicy) -> QueryOutcome {
    if policy == ExecutionPolicy::ReadOnly && !is_read_only(sql) {
        return QueryOutcome::Error(format!(
            "Rejected by read-only policy: statement does not start with a read-only keyword: {}",
            first_keyword(sql).unwrap_or_default()
        ));
    }
    match run_statement(db_path, sql) {
        Ok(result) => QueryOutcome::Rows(result),
        Err(e) => QueryOutcome::Error(e.to_string())
    }
}

fn run_statement(db_path: &Path, sql: &str) -> Result<ResultSet, rusqlite::Error> {
    let conn = Connection::open(db_path)?;
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();

    let mut rows = Vec::new();
    let mut raw_rows = stmt.query([])?;
    while let Some(row) = raw_rows.next()? {
        let mut cells = Vec::with_capacity(columns.len());
        for i in 0..columns.len() {
            let value: Value = row.get(i)?;
            cells.push(CellValue::from(value));
        }
        rows.push(cells);
    }

    Ok(ResultSet {
        columns,
        rows
    })
}

/// Check whether a statement's first keyword is read-only.
///
/// A textual check on the leading keyword, not a parse: SELECT, WITH,
/// EXPLAIN and VALUES pass, everything else is rejected. Good enough as an
/// allowlist gate for model-generated statements; it does not try to reason
/// about what follows.
pub fn is_read_only(sql: &str) -> bool {
    match first_keyword(sql) {
        Some(kw) => matches!(kw.as_str(), "SELECT" | "WITH" | "EXPLAIN" | "VALUES"),
        None => false
    }
}

fn first_keyword(sql: &str) -> Option<String> {
    // The keyword may run straight into punctuation, as in `SELECT*FROM`
    let keyword: String = sql
        .trim_start_matches(|c: char| !c.is_ascii_alphabetic())
        .chars()
        .take_while(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .collect();
    if keyword.is_empty() { None } else { Some(keyword) }
}
