//! Query executor for the SQLite store.
//!
//! Each execution opens its own connection, scoped to the call and
//! released on every exit path. Rows come back as ordered column-name →
//! value objects in the store's native order, capped at [`MAX_ROWS`]
//! while the true match count is tracked separately.

use std::path::{Path, PathBuf};

use rusqlite::types::ValueRef;
use rusqlite::Connection;
use serde_json::{Map, Number, Value};

use crate::chat::types::ResultSet;
use crate::error::ExecutionError;

/// Maximum number of rows returned across the core boundary.
pub const MAX_ROWS: usize = 50;

/// Executes validated read-only queries against the store.
#[derive(Debug, Clone)]
pub struct QueryExecutor {
    db_path: PathBuf,
}

impl QueryExecutor {
    pub fn new(db_path: impl AsRef<Path>) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
        }
    }

    /// Execute a query and return capped rows plus the true match count.
    ///
    /// Engine errors (unknown column, syntax errors the validator cannot
    /// catch) surface verbatim; there is no retry.
    pub async fn execute_read(&self, sql: &str) -> Result<ResultSet, ExecutionError> {
        let path = self.db_path.clone();
        let sql = sql.to_string();

        tokio::task::spawn_blocking(move || run_query(&path, &sql))
            .await
            .map_err(|e| ExecutionError::Task(e.to_string()))?
    }
}

fn run_query(path: &Path, sql: &str) -> Result<ResultSet, ExecutionError> {
    let conn = Connection::open(path).map_err(|e| ExecutionError::Open(e.to_string()))?;

    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| ExecutionError::Query(e.to_string()))?;
    let column_names: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();

    let mut rows = stmt
        .query([])
        .map_err(|e| ExecutionError::Query(e.to_string()))?;

    let mut out = Vec::new();
    let mut total = 0usize;

    while let Some(row) = rows
        .next()
        .map_err(|e| ExecutionError::Query(e.to_string()))?
    {
        total += 1;
        if out.len() < MAX_ROWS {
            let mut obj = Map::new();
            for (i, name) in column_names.iter().enumerate() {
                let value = row
                    .get_ref(i)
                    .map_err(|e| ExecutionError::Query(e.to_string()))?;
                obj.insert(name.clone(), value_ref_to_json(value));
            }
            out.push(Value::Object(obj));
        }
    }

    let truncated = total > out.len();
    Ok(ResultSet {
        rows: out,
        total,
        truncated,
    })
}

fn value_ref_to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Number(i.into()),
        ValueRef::Real(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::String(format!("<blob {} bytes>", b.len())),
    }
}
