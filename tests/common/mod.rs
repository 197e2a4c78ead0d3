//! Common test utilities and helpers
//!
//! Shared test infrastructure for integration tests.

#![allow(dead_code)]

use joinwise::config::{ConnectionConfig, SslMode};
use joinwise::db::{QueryProvider, QueryResults};
use joinwise::error::{DbError, DbResult};
use joinwise::schema::{FOREIGN_KEY_QUERY, TABLE_LIST_QUERY};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Tables of the sample shop schema
pub const TABLES: &[&str] = &[
    "dbo.AuditLog",
    "dbo.Customer",
    "dbo.Order",
    "dbo.OrderLine",
    "dbo.Product",
];

/// Foreign keys of the sample shop schema, parent first
pub const FOREIGN_KEYS: &[[&str; 4]] = &[
    ["dbo.Order", "CustomerId", "dbo.Customer", "Id"],
    ["dbo.OrderLine", "OrderId", "dbo.Order", "Id"],
    ["dbo.OrderLine", "ProductId", "dbo.Product", "Id"],
];

/// Answers the two catalog queries from memory
pub struct MemoryProvider {
    tables: Vec<String>,
    foreign_keys: Vec<[String; 4]>,
    failing: AtomicBool,
    queries: AtomicUsize,
}

impl MemoryProvider {
    pub fn new(tables: &[&str], foreign_keys: &[[&str; 4]]) -> Self {
        Self {
            tables: tables.iter().map(|t| t.to_string()).collect(),
            foreign_keys: foreign_keys
                .iter()
                .map(|fk| fk.map(|s| s.to_string()))
                .collect(),
            failing: AtomicBool::new(false),
            queries: AtomicUsize::new(0),
        }
    }

    /// The sample shop schema
    pub fn shop() -> Self {
        Self::new(TABLES, FOREIGN_KEYS)
    }

    /// Make every following query fail as if the server went away
    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl QueryProvider for MemoryProvider {
    async fn run_query(&self, sql: &str) -> DbResult<QueryResults> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(DbError::QueryFailed("server closed the connection".to_string()));
        }

        if sql == TABLE_LIST_QUERY {
            let rows: Vec<Vec<&str>> = self.tables.iter().map(|t| vec![t.as_str()]).collect();
            let rows: Vec<&[&str]> = rows.iter().map(Vec::as_slice).collect();
            Ok(QueryResults::from_text_rows(&["name"], &rows))
        } else if sql == FOREIGN_KEY_QUERY {
            let rows: Vec<Vec<&str>> = self
                .foreign_keys
                .iter()
                .map(|fk| fk.iter().map(String::as_str).collect())
                .collect();
            let rows: Vec<&[&str]> = rows.iter().map(Vec::as_slice).collect();
            Ok(QueryResults::from_text_rows(
                &["parent_table", "parent_column", "child_table", "child_column"],
                &rows,
            ))
        } else {
            Err(DbError::QueryFailed(format!("unexpected query: {}", sql)))
        }
    }
}

/// Create a test connection configuration
pub fn test_connection_config() -> ConnectionConfig {
    ConnectionConfig {
        name: "test".to_string(),
        host: "localhost".to_string(),
        port: 5432,
        database: "test_db".to_string(),
        username: "test_user".to_string(),
        password: Some("test_password".to_string()),
        ssl_mode: SslMode::Disable,
    }
}
