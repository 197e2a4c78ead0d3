//! Database abstraction layer
//!
//! This module provides a trait-based abstraction over query execution,
//! so the schema loader can run against PostgreSQL or an in-memory fake.

pub mod postgres;
pub mod provider;
pub mod types;

// Re-export main types
pub use provider::QueryProvider;
pub use types::{CellValue, ColumnDef, QueryResults, Row};
