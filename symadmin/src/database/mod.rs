// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! SQLite access for the admin: authors, sections and password reset tokens.
//!
//! Every statement goes through [`Database`]. The process holds one shared
//! connection; each request works through its own handle from
//! [`Database::for_request`] so the queries it ran can be listed on the
//! database error page.

mod schema;

pub use schema::{create_schema, schema_exists};

use crate::config::{DatabaseConfig, QueryCaching};
use rusqlite::{Connection, OptionalExtension, Params, Row, Statement};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Oldest entries are dropped past this many recorded queries.
const MAX_RECORDED_QUERIES: usize = 200;

#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseError {
    Connection(String),
    Query { message: String, query: String },
}

impl DatabaseError {
    fn query(err: rusqlite::Error, query: &str) -> Self {
        DatabaseError::Query {
            message: err.to_string(),
            query: query.trim().to_string(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            DatabaseError::Connection(message) => message,
            DatabaseError::Query { message, .. } => message,
        }
    }

    pub fn failed_query(&self) -> Option<&str> {
        match self {
            DatabaseError::Connection(_) => None,
            DatabaseError::Query { query, .. } => Some(query),
        }
    }
}

impl std::fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatabaseError::Connection(msg) => write!(f, "Database connection error: {}", msg),
            DatabaseError::Query { message, query } => {
                write!(f, "Database query failed: {} [{}]", message, query)
            }
        }
    }
}

impl std::error::Error for DatabaseError {}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryRecord {
    pub query: String,
    /// Seconds.
    pub time: f64,
}

struct SharedConnection {
    conn: Mutex<Connection>,
    tbl_prefix: String,
    cache_statements: bool,
}

pub struct Database {
    shared: Arc<SharedConnection>,
    queries: Mutex<Vec<QueryRecord>>,
}

impl Database {
    pub fn open(path: &Path, config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|e| {
            DatabaseError::Connection(format!(
                "Failed to open database '{}': {}",
                path.display(),
                e
            ))
        })?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA foreign_keys = ON;",
        )
        .map_err(|e| DatabaseError::Connection(e.to_string()))?;
        Ok(Self::from_connection(conn, config))
    }

    pub fn open_in_memory(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let conn =
            Connection::open_in_memory().map_err(|e| DatabaseError::Connection(e.to_string()))?;
        Ok(Self::from_connection(conn, config))
    }

    fn from_connection(conn: Connection, config: &DatabaseConfig) -> Self {
        let cache_statements = config.query_caching != QueryCaching::Off;
        if !cache_statements {
            conn.set_prepared_statement_cache_capacity(0);
        }
        Self {
            shared: Arc::new(SharedConnection {
                conn: Mutex::new(conn),
                tbl_prefix: config.tbl_prefix.clone(),
                cache_statements,
            }),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// A handle on the same connection with an empty query log of its own.
    pub fn for_request(&self) -> Database {
        Database {
            shared: Arc::clone(&self.shared),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Prefixed table name. The prefix is restricted to `[A-Za-z0-9_]` by
    /// configuration validation, so it is safe to splice into SQL.
    pub fn table(&self, name: &str) -> String {
        format!("{}{}", self.shared.tbl_prefix, name)
    }

    pub fn tbl_prefix(&self) -> &str {
        &self.shared.tbl_prefix
    }

    pub fn execute<P: Params>(&self, sql: &str, params: P) -> Result<usize, DatabaseError> {
        self.with_statement(sql, |stmt| stmt.execute(params))
    }

    pub fn execute_batch(&self, sql: &str) -> Result<(), DatabaseError> {
        let started = Instant::now();
        let result = self.lock()?.execute_batch(sql);
        self.record(sql, started.elapsed());
        result.map_err(|e| DatabaseError::query(e, sql))
    }

    /// First row mapped through `map`, or `None` when the query matched nothing.
    pub fn fetch_row<T, P, F>(&self, sql: &str, params: P, map: F) -> Result<Option<T>, DatabaseError>
    where
        P: Params,
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        self.with_statement(sql, |stmt| stmt.query_row(params, map).optional())
    }

    pub fn fetch_all<T, P, F>(&self, sql: &str, params: P, map: F) -> Result<Vec<T>, DatabaseError>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        self.with_statement(sql, |stmt| {
            stmt.query_map(params, map)?
                .collect::<rusqlite::Result<Vec<T>>>()
        })
    }

    /// Runs a single-row INSERT and returns its rowid, read before the
    /// connection is released.
    pub fn insert<P: Params>(&self, sql: &str, params: P) -> Result<i64, DatabaseError> {
        self.with_statement(sql, |stmt| stmt.insert(params))
    }

    /// Queries executed since the last [`Database::reset_debug`].
    pub fn debug(&self) -> Vec<QueryRecord> {
        match self.queries.lock() {
            Ok(queries) => queries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn reset_debug(&self) {
        match self.queries.lock() {
            Ok(mut queries) => queries.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }

    fn with_statement<T, F>(&self, sql: &str, run: F) -> Result<T, DatabaseError>
    where
        F: FnOnce(&mut Statement<'_>) -> rusqlite::Result<T>,
    {
        let started = Instant::now();
        let conn = self.lock()?;
        let result = if self.shared.cache_statements {
            conn.prepare_cached(sql).and_then(|mut stmt| run(&mut stmt))
        } else {
            conn.prepare(sql).and_then(|mut stmt| run(&mut stmt))
        };
        drop(conn);
        self.record(sql, started.elapsed());
        result.map_err(|e| {
            log::error!("Query failed: {} [{}]", e, sql.trim());
            DatabaseError::query(e, sql)
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, DatabaseError> {
        self.shared
            .conn
            .lock()
            .map_err(|_| DatabaseError::Connection("Database connection lock poisoned".to_string()))
    }

    fn record(&self, sql: &str, elapsed: Duration) {
        let query = sql.split_whitespace().collect::<Vec<_>>().join(" ");
        log::debug!("[{:.4}s] {}", elapsed.as_secs_f64(), query);
        let mut queries = match self.queries.lock() {
            Ok(queries) => queries,
            Err(poisoned) => poisoned.into_inner(),
        };
        if queries.len() >= MAX_RECORDED_QUERIES {
            queries.remove(0);
        }
        queries.push(QueryRecord {
            query,
            time: elapsed.as_secs_f64(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_db(query_caching: QueryCaching) -> Database {
        let config = DatabaseConfig {
            query_caching,
            ..DatabaseConfig::default()
        };
        let db = Database::open_in_memory(&config).unwrap();
        create_schema(&db).unwrap();
        db
    }

    #[test]
    fn table_names_carry_the_prefix() {
        let db = memory_db(QueryCaching::Default);
        assert_eq!(db.table("authors"), "tbl_authors");
    }

    #[test]
    fn queries_are_recorded_until_reset() {
        let db = memory_db(QueryCaching::On);
        db.reset_debug();
        let sql = format!("SELECT COUNT(*) FROM {}", db.table("sections"));
        let count: Option<i64> = db.fetch_row(&sql, [], |row| row.get(0)).unwrap();
        assert_eq!(count, Some(0));

        let recorded = db.debug();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].query, "SELECT COUNT(*) FROM tbl_sections");

        db.reset_debug();
        assert!(db.debug().is_empty());
    }

    #[test]
    fn request_handles_keep_separate_query_logs() {
        let db = memory_db(QueryCaching::Default);
        let first = db.for_request();
        let second = db.for_request();

        let insert = format!(
            "INSERT INTO {} (name, handle, sortorder) VALUES (?1, ?2, ?3)",
            first.table("sections")
        );
        let id = first.insert(&insert, rusqlite::params!["Articles", "articles", 1]).unwrap();

        second.reset_debug();
        let select = format!("SELECT handle FROM {} WHERE id = ?1", second.table("sections"));
        let handle: Option<String> = second.fetch_row(&select, [id], |row| row.get(0)).unwrap();
        assert_eq!(handle.as_deref(), Some("articles"));

        let first_log = first.debug();
        assert_eq!(first_log.len(), 1);
        assert!(first_log[0].query.starts_with("INSERT INTO tbl_sections"));
        let second_log = second.debug();
        assert_eq!(second_log.len(), 1);
        assert!(second_log[0].query.starts_with("SELECT handle FROM tbl_sections"));
    }

    #[test]
    fn failing_query_reports_the_statement() {
        let db = memory_db(QueryCaching::Off);
        let err = db
            .execute("DELETE FROM tbl_missing WHERE id = ?1", [1])
            .unwrap_err();
        assert_eq!(err.failed_query(), Some("DELETE FROM tbl_missing WHERE id = ?1"));
        assert!(err.message().contains("no such table"));
    }

    #[test]
    fn missing_rows_are_none() {
        let db = memory_db(QueryCaching::Default);
        let sql = format!("SELECT handle FROM {} WHERE id = ?1", db.table("sections"));
        let handle: Option<String> = db.fetch_row(&sql, [42], |row| row.get(0)).unwrap();
        assert!(handle.is_none());
    }
}
