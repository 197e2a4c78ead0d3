//! Join-aware SQL completion
//!
//! Three pieces, run per completion request against one schema snapshot:
//!
//! - [`scanner`]: which tables the current statement already references
//! - [`alias`]: short, collision-free aliases for those tables and for
//!   the tables being suggested
//! - [`engine`]: picks the completion context from the text before the
//!   cursor and renders suggestions

pub mod alias;
pub mod engine;
pub mod scanner;

use serde::Serialize;

pub use alias::{AliasScope, Table, assign_alias, derive_alias};
pub use engine::{CompletionContext, SuggestionEngine, detect_context};
pub use scanner::{CursorLine, Position, StatementScanner, referenced_tables};

/// A completion entry handed back to the editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
    /// The text to insert
    pub label: String,
    /// Type of completion
    pub kind: CompletionKind,
    /// Additional information to display
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Type of completion entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionKind {
    /// `schema.table alias`
    Table,
    /// `schema.table alias ON a.x = alias.y`
    Join,
    /// `a.x = b.y` after `ON`
    Predicate,
}
