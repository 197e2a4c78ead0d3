//! Foreign-key join graph
//!
//! Turns the flat rows of the foreign-key query into one node per table,
//! each listing every table reachable through exactly one foreign key.
//! Edges are recorded from both ends, so a node sees its join partners no
//! matter which side declared the key.

use indexmap::IndexMap;
use serde::Serialize;

/// One foreign-key column pair, exactly as the catalog query returns it.
///
/// `parent_table` is the table that declares the constraint and
/// `child_table` the one it references.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ForeignKeyEdge {
    pub parent_table: String,
    pub parent_column: String,
    pub child_table: String,
    pub child_column: String,
}

impl ForeignKeyEdge {
    pub fn new(
        parent_table: impl Into<String>,
        parent_column: impl Into<String>,
        child_table: impl Into<String>,
        child_column: impl Into<String>,
    ) -> Self {
        Self {
            parent_table: parent_table.into(),
            parent_column: parent_column.into(),
            child_table: child_table.into(),
            child_column: child_column.into(),
        }
    }
}

/// Which side of the foreign key the owning node is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinDirection {
    /// Own table is the parent; the neighbor is the child
    ToChild,
    /// Own table is the child; the neighbor is the parent
    ToParent,
}

/// One way to join `own_table.own_column = neighbor_table.neighbor_column`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct JoinEdge {
    pub neighbor_table: String,
    pub neighbor_column: String,
    pub own_column: String,
    pub own_table: String,
    pub direction: JoinDirection,
}

impl JoinEdge {
    /// `(table, column)` pairs ordered parent first
    pub fn parent_and_child(&self) -> ((&str, &str), (&str, &str)) {
        let own = (self.own_table.as_str(), self.own_column.as_str());
        let neighbor = (self.neighbor_table.as_str(), self.neighbor_column.as_str());
        match self.direction {
            JoinDirection::ToChild => (own, neighbor),
            JoinDirection::ToParent => (neighbor, own),
        }
    }
}

/// A table taking part in at least one foreign key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaNode {
    pub table: String,
    pub joins: Vec<JoinEdge>,
}

/// All nodes, keyed by qualified table name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SchemaGraph {
    nodes: IndexMap<String, SchemaNode>,
}

impl SchemaGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a node by qualified name
    pub fn node(&self, table: &str) -> Option<&SchemaNode> {
        self.nodes.get(table)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &SchemaNode> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total number of join edges across all nodes
    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|n| n.joins.len()).sum()
    }
}

/// Build the join graph from foreign-key rows.
///
/// Never fails: empty input is an empty graph, and duplicate rows simply
/// produce duplicate edges.
pub fn build_graph(edges: &[ForeignKeyEdge]) -> SchemaGraph {
    let mut nodes: IndexMap<String, SchemaNode> = IndexMap::new();

    for fk in edges {
        node_for(&mut nodes, &fk.parent_table).joins.push(JoinEdge {
            neighbor_table: fk.child_table.clone(),
            neighbor_column: fk.child_column.clone(),
            own_column: fk.parent_column.clone(),
            own_table: fk.parent_table.clone(),
            direction: JoinDirection::ToChild,
        });
        node_for(&mut nodes, &fk.child_table).joins.push(JoinEdge {
            neighbor_table: fk.parent_table.clone(),
            neighbor_column: fk.parent_column.clone(),
            own_column: fk.child_column.clone(),
            own_table: fk.child_table.clone(),
            direction: JoinDirection::ToParent,
        });
    }

    SchemaGraph { nodes }
}

fn node_for<'a>(nodes: &'a mut IndexMap<String, SchemaNode>, table: &str) -> &'a mut SchemaNode {
    nodes
        .entry(table.to_string())
        .or_insert_with(|| SchemaNode {
            table: table.to_string(),
            joins: Vec::new(),
        })
}
