//! Query result types
//!
//! The shape every `QueryProvider` hands back: named columns and rows of
//! cell values, one complete result set per call.

/// Query execution results
#[derive(Debug, Clone, Default)]
pub struct QueryResults {
    /// Column definitions
    pub columns: Vec<ColumnDef>,
    /// Result rows
    pub rows: Vec<Row>,
}

/// Column definition in query results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    /// Column name
    pub name: String,
}

/// A single row of query results
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Cell values in column order
    pub values: Vec<CellValue>,
}

/// A cell value (single column value in a row)
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// NULL value
    Null,

    /// Integer value
    Integer(i64),

    /// Text/string value
    Text(String),

    /// Boolean value
    Boolean(bool),
}

impl QueryResults {
    pub fn new(columns: Vec<ColumnDef>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// Build results from rows of text cells. Handy for fixtures and for
    /// providers that only ever return names.
    pub fn from_text_rows(column_names: &[&str], rows: &[&[&str]]) -> Self {
        let columns = column_names
            .iter()
            .map(|name| ColumnDef {
                name: name.to_string(),
            })
            .collect();
        let rows = rows
            .iter()
            .map(|cells| Row {
                values: cells
                    .iter()
                    .map(|c| CellValue::Text(c.to_string()))
                    .collect(),
            })
            .collect();
        Self::new(columns, rows)
    }
}

impl Row {
    /// Text of the cell at `idx`, if present and not NULL
    pub fn text(&self, idx: usize) -> Option<String> {
        match self.values.get(idx)? {
            CellValue::Null => None,
            value => Some(value.display_string()),
        }
    }
}

impl CellValue {
    /// Get a display string for this cell value
    pub fn display_string(&self) -> String {
        match self {
            CellValue::Null => "NULL".to_string(),
            CellValue::Integer(i) => i.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::Boolean(b) => b.to_string(),
        }
    }
}
