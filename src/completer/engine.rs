//! Suggestion engine
//!
//! The context comes from the text before the cursor on the cursor line:
//!
//! | line ends with    | suggestions                                   |
//! |-------------------|-----------------------------------------------|
//! | `from <partial>`  | every known table with a fresh alias          |
//! | `join <partial>`  | joinable tables with an `ON` clause, then the table list |
//! | `on <partial>`    | join predicates between the newest table and earlier ones |
//!
//! Anything else gets no suggestions. The engine never fails; an empty
//! snapshot or an unrecognized statement just yields fewer entries.

use crate::completer::alias::{AliasScope, Table, assign_alias};
use crate::completer::scanner::{Position, StatementScanner, line_prefix};
use crate::completer::{Completion, CompletionKind};
use crate::config::CompletionSettings;
use crate::schema::{JoinDirection, JoinEdge, SchemaSnapshot};
use indexmap::IndexMap;
use regex::Regex;
use std::sync::LazyLock;

static TRIGGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(from|join|on)\s+\w*$").expect("valid regex"));

/// Where the cursor is, as far as suggestions are concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionContext {
    AfterFrom,
    AfterJoin,
    AfterOn,
}

/// Match the completion trigger against the text before the cursor
pub fn detect_context(before_cursor: &str) -> Option<CompletionContext> {
    let caps = TRIGGER.captures(before_cursor)?;
    let keyword = caps.get(1)?.as_str();
    if keyword.eq_ignore_ascii_case("from") {
        Some(CompletionContext::AfterFrom)
    } else if keyword.eq_ignore_ascii_case("join") {
        Some(CompletionContext::AfterJoin)
    } else {
        Some(CompletionContext::AfterOn)
    }
}

#[derive(Debug, Clone)]
pub struct SuggestionEngine {
    scanner: StatementScanner,
    table_list_after_join: bool,
}

impl Default for SuggestionEngine {
    fn default() -> Self {
        Self::new(&CompletionSettings::default())
    }
}

impl SuggestionEngine {
    pub fn new(settings: &CompletionSettings) -> Self {
        Self {
            scanner: StatementScanner::new(settings.cursor_line),
            table_list_after_join: settings.table_list_after_join,
        }
    }

    /// Suggestions for `cursor` in `text`
    pub fn complete(
        &self,
        snapshot: &SchemaSnapshot,
        text: &str,
        cursor: Position,
    ) -> Vec<Completion> {
        let line = text.lines().nth(cursor.line).unwrap_or("");
        let Some(context) = detect_context(line_prefix(line, cursor.character)) else {
            return Vec::new();
        };

        let items = match context {
            CompletionContext::AfterFrom => self.table_suggestions(snapshot),
            CompletionContext::AfterJoin => {
                let referenced = self.scanner.referenced_tables(text, cursor);
                let mut items = self.join_suggestions(snapshot, referenced);
                if self.table_list_after_join {
                    items.extend(self.table_suggestions(snapshot));
                }
                items
            }
            CompletionContext::AfterOn => {
                let referenced = self.scanner.referenced_tables(text, cursor);
                self.on_suggestions(snapshot, referenced)
            }
        };
        tracing::debug!(?context, suggestions = items.len(), "completion request");
        items
    }

    /// Every known table, each aliased on its own
    pub fn table_suggestions(&self, snapshot: &SchemaSnapshot) -> Vec<Completion> {
        snapshot
            .tables
            .iter()
            .map(|name| {
                let alias = assign_alias(&mut Table::new(name.as_str()), &[]);
                Completion {
                    label: format!("{} {}", name, alias),
                    kind: CompletionKind::Table,
                    detail: None,
                }
            })
            .collect()
    }

    /// `<neighbor> <alias> ON <own>.<col> = <alias>.<col>` for every join
    /// edge of every referenced table, deduplicated by label
    pub fn join_suggestions(
        &self,
        snapshot: &SchemaSnapshot,
        referenced: Vec<Table>,
    ) -> Vec<Completion> {
        let scope = AliasScope::from_tables(referenced);
        let mut unique: IndexMap<String, Completion> = IndexMap::new();

        for table in scope.tables() {
            let Some(node) = snapshot.graph.node(&table.name) else {
                continue;
            };
            let own_alias = table.alias().unwrap_or(&table.name);
            for edge in &node.joins {
                let neighbor_alias = scope.alias_for(&edge.neighbor_table);
                let label = format!(
                    "{} {} ON {}.{} = {}.{}",
                    edge.neighbor_table,
                    neighbor_alias,
                    own_alias,
                    edge.own_column,
                    neighbor_alias,
                    edge.neighbor_column
                );
                unique.entry(label.clone()).or_insert_with(|| Completion {
                    label,
                    kind: CompletionKind::Join,
                    detail: Some(foreign_key_detail(edge)),
                });
            }
        }

        unique.into_values().collect()
    }

    /// Predicates joining the last referenced table to any earlier one,
    /// parent side first
    pub fn on_suggestions(
        &self,
        snapshot: &SchemaSnapshot,
        referenced: Vec<Table>,
    ) -> Vec<Completion> {
        let scope = AliasScope::from_tables(referenced);
        let Some((current, earlier)) = scope.tables().split_last() else {
            return Vec::new();
        };
        let Some(node) = snapshot.graph.node(&current.name) else {
            return Vec::new();
        };
        let current_alias = current.alias().unwrap_or(&current.name);

        let mut unique: IndexMap<String, Completion> = IndexMap::new();
        for edge in &node.joins {
            for other in earlier.iter().filter(|t| t.name == edge.neighbor_table) {
                let other_alias = other.alias().unwrap_or(&other.name);
                let (parent_alias, child_alias) = match edge.direction {
                    JoinDirection::ToChild => (current_alias, other_alias),
                    JoinDirection::ToParent => (other_alias, current_alias),
                };
                let ((_, parent_column), (_, child_column)) = edge.parent_and_child();
                let label = format!(
                    "{}.{} = {}.{}",
                    parent_alias, parent_column, child_alias, child_column
                );
                unique.entry(label.clone()).or_insert_with(|| Completion {
                    label,
                    kind: CompletionKind::Predicate,
                    detail: Some(foreign_key_detail(edge)),
                });
            }
        }

        unique.into_values().collect()
    }
}

fn foreign_key_detail(edge: &JoinEdge) -> String {
    let ((parent_table, parent_column), (child_table, child_column)) = edge.parent_and_child();
    format!(
        "{}.{} references {}.{}",
        parent_table, parent_column, child_table, child_column
    )
}
