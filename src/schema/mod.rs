//! Schema metadata
//!
//! Catalog queries, the foreign-key join graph, and the immutable snapshot
//! the completer reads.

pub mod graph;
pub mod introspection;
pub mod snapshot;

pub use graph::{ForeignKeyEdge, JoinDirection, JoinEdge, SchemaGraph, SchemaNode, build_graph};
pub use introspection::{FOREIGN_KEY_QUERY, TABLE_LIST_QUERY, load_snapshot};
pub use snapshot::SchemaSnapshot;
