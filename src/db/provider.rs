//! Database provider trait
//!
//! The query collaborator the schema loader depends on. From the loader's
//! point of view a call is one awaited request returning one complete
//! result set; nothing is streamed.
//! This abstraction allows for:
//! - Swapping the backend without touching the completion core
//! - Easy testing with in-memory implementations

use crate::db::types::QueryResults;
use crate::error::DbResult;
use std::future::Future;

/// Executes SQL against the current connection
pub trait QueryProvider: Send + Sync {
    /// Execute a SQL query and return all rows
    ///
    /// # Errors
    /// Returns `DbError::QueryFailed` if query execution fails
    /// Returns `DbError::NotConnected` if the connection is gone
    fn run_query(&self, sql: &str) -> impl Future<Output = DbResult<QueryResults>> + Send;
}
