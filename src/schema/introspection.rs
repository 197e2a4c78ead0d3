//! Schema introspection
//!
//! The two catalog queries the completer depends on, and the tolerant
//! conversion of their result sets into a `SchemaSnapshot`.

use crate::db::{QueryProvider, QueryResults};
use crate::error::DbResult;
use crate::schema::graph::ForeignKeyEdge;
use crate::schema::snapshot::SchemaSnapshot;

/// One row per table; single column `schema.table`
pub const TABLE_LIST_QUERY: &str = "\
SELECT n.nspname::text || '.' || c.relname::text AS name \
FROM pg_class c \
JOIN pg_namespace n ON n.oid = c.relnamespace \
WHERE c.relkind IN ('r', 'p') \
  AND NOT c.relispartition \
  AND n.nspname NOT LIKE 'pg_%' \
  AND n.nspname != 'information_schema' \
ORDER BY 1";

/// One row per foreign-key column pair: the constrained table and column
/// (parent) followed by the referenced table and column (child)
pub const FOREIGN_KEY_QUERY: &str = "\
SELECT n.nspname::text || '.' || c.relname::text AS parent_table, \
       a.attname::text AS parent_column, \
       fn.nspname::text || '.' || fc.relname::text AS child_table, \
       fa.attname::text AS child_column \
FROM pg_constraint con \
JOIN pg_class c ON c.oid = con.conrelid \
JOIN pg_namespace n ON n.oid = c.relnamespace \
JOIN pg_class fc ON fc.oid = con.confrelid \
JOIN pg_namespace fn ON fn.oid = fc.relnamespace \
JOIN LATERAL unnest(con.conkey, con.confkey) AS k(attnum, fattnum) ON true \
JOIN pg_attribute a ON a.attrelid = c.oid AND a.attnum = k.attnum \
JOIN pg_attribute fa ON fa.attrelid = fc.oid AND fa.attnum = k.fattnum \
WHERE con.contype = 'f' \
  AND n.nspname NOT LIKE 'pg_%' \
  AND n.nspname != 'information_schema' \
ORDER BY 1, 3, 2";

/// Table names from the first column of each row. NULL and empty cells are
/// skipped.
pub fn tables_from_results(results: &QueryResults) -> Vec<String> {
    results
        .rows
        .iter()
        .filter_map(|row| row.text(0))
        .filter(|name| !name.trim().is_empty())
        .collect()
}

/// Foreign-key edges from four-column rows. Rows that are short or carry a
/// NULL are skipped rather than failing the refresh.
pub fn edges_from_results(results: &QueryResults) -> Vec<ForeignKeyEdge> {
    let edges: Vec<ForeignKeyEdge> = results
        .rows
        .iter()
        .filter_map(|row| {
            Some(ForeignKeyEdge {
                parent_table: row.text(0)?,
                parent_column: row.text(1)?,
                child_table: row.text(2)?,
                child_column: row.text(3)?,
            })
        })
        .collect();
    let skipped = results.rows.len() - edges.len();
    if skipped > 0 {
        tracing::warn!(skipped, "ignored malformed foreign-key rows");
    }
    edges
}

/// Run both catalog queries and build a fresh snapshot.
///
/// # Errors
/// Propagates the provider's error; the caller decides how to report it.
pub async fn load_snapshot<P: QueryProvider>(provider: &P) -> DbResult<SchemaSnapshot> {
    let table_results = provider.run_query(TABLE_LIST_QUERY).await?;
    let tables = tables_from_results(&table_results);

    let fk_results = provider.run_query(FOREIGN_KEY_QUERY).await?;
    let edges = edges_from_results(&fk_results);

    let snapshot = SchemaSnapshot::new(tables, &edges);
    tracing::info!(
        tables = snapshot.tables.len(),
        foreign_keys = edges.len(),
        joinable_tables = snapshot.graph.len(),
        "schema snapshot built"
    );
    Ok(snapshot)
}
