//! Immutable schema snapshot
//!
//! Everything a completion request reads: the full table list and the join
//! graph. A refresh builds a new snapshot and the owner swaps the `Arc`;
//! nothing in here is ever mutated after construction.

use crate::schema::graph::{ForeignKeyEdge, SchemaGraph, build_graph};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchemaSnapshot {
    /// Qualified names of every table, in catalog order
    pub tables: Vec<String>,
    /// Join graph built from the foreign-key rows
    pub graph: SchemaGraph,
}

impl SchemaSnapshot {
    /// An empty snapshot, used before the first refresh completes
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(tables: Vec<String>, edges: &[ForeignKeyEdge]) -> Self {
        Self {
            tables,
            graph: build_graph(edges),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.graph.is_empty()
    }
}
