//! Statement scanner
//!
//! Finds the tables already named after `FROM`/`JOIN` in the statement the
//! cursor is in. This is a line heuristic, not a parser: the statement
//! starts at the nearest line above the cursor (inclusive) containing
//! `SELECT`, `UPDATE` or `DELETE`, and ends on the cursor line.

use crate::completer::alias::Table;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static STATEMENT_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(select|update|delete)\b").expect("valid regex"));

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex"));

/// Words that can follow a table name without being its alias
const CLAUSE_KEYWORDS: &[&str] = &[
    "ON", "JOIN", "INNER", "LEFT", "RIGHT", "FULL", "OUTER", "CROSS", "NATURAL", "WHERE",
    "GROUP", "ORDER", "HAVING", "LIMIT", "OFFSET", "FETCH", "UNION", "INTERSECT", "EXCEPT",
    "WINDOW", "USING", "SET", "VALUES", "RETURNING", "FOR", "WITH", "LATERAL", "SELECT", "FROM",
    "UPDATE", "DELETE", "AS",
];

/// Zero-based line and character (Unicode scalar) offset, as editors send it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

impl Position {
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

/// How much of the cursor line belongs to the statement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorLine {
    /// Only the text before the cursor, minus a word still being typed
    #[default]
    Truncate,
    /// The whole line, including anything after the cursor
    Whole,
}

/// Extracts referenced tables for one completion request
#[derive(Debug, Clone, Copy, Default)]
pub struct StatementScanner {
    cursor_line: CursorLine,
}

impl StatementScanner {
    pub fn new(cursor_line: CursorLine) -> Self {
        Self { cursor_line }
    }

    /// Tables named after `FROM`/`JOIN` in the statement around `cursor`,
    /// in document order. Empty when no statement start is found.
    ///
    /// Table names are the raw tokens as typed. An alias written after the
    /// table (`dbo.Customer c` or `dbo.Customer AS c`) is kept on the
    /// returned `Table`; every other table comes back unaliased.
    pub fn referenced_tables(&self, text: &str, cursor: Position) -> Vec<Table> {
        match self.statement_text(text, cursor) {
            Some(statement) => tables_in(&statement),
            None => Vec::new(),
        }
    }

    /// Lines from the statement start through the cursor line, joined by
    /// single spaces
    pub fn statement_text(&self, text: &str, cursor: Position) -> Option<String> {
        let lines: Vec<&str> = text.lines().collect();
        let full_line = lines.get(cursor.line).copied().unwrap_or("");
        let cursor_text = match self.cursor_line {
            CursorLine::Whole => full_line,
            CursorLine::Truncate => without_partial_word(line_prefix(full_line, cursor.character)),
        };

        let start = (0..=cursor.line).rev().find(|&i| {
            let line = if i == cursor.line {
                cursor_text
            } else {
                lines.get(i).copied().unwrap_or("")
            };
            STATEMENT_START.is_match(line)
        })?;

        let mut parts: Vec<&str> = (start..cursor.line)
            .map(|i| lines.get(i).copied().unwrap_or(""))
            .collect();
        parts.push(cursor_text);
        Some(parts.join(" "))
    }
}

/// Tables referenced in `text` under the default scanner
pub fn referenced_tables(text: &str, cursor: Position) -> Vec<Table> {
    StatementScanner::default().referenced_tables(text, cursor)
}

/// Text of `line` before the `character`-th char
pub fn line_prefix(line: &str, character: usize) -> &str {
    let end = line
        .char_indices()
        .nth(character)
        .map_or(line.len(), |(i, _)| i);
    &line[..end]
}

/// Drop a trailing word the user is still typing
fn without_partial_word(prefix: &str) -> &str {
    prefix.trim_end_matches(|c: char| !c.is_whitespace())
}

fn tables_in(statement: &str) -> Vec<Table> {
    let tokens: Vec<&str> = statement.split_whitespace().collect();
    let mut tables = Vec::new();

    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i];
        if !(token.eq_ignore_ascii_case("from") || token.eq_ignore_ascii_case("join")) {
            i += 1;
            continue;
        }
        let Some(name) = tokens.get(i + 1) else {
            break;
        };
        let (alias, consumed) = alias_after(&tokens[i + 2..]);
        tables.push(match alias {
            Some(alias) => Table::with_alias(*name, alias),
            None => Table::new(*name),
        });
        i += 2 + consumed;
    }

    tables
}

/// Explicit alias at the start of `rest`, and how many tokens it used
fn alias_after<'a>(rest: &[&'a str]) -> (Option<&'a str>, usize) {
    match rest {
        [kw, alias, ..] if kw.eq_ignore_ascii_case("as") && is_alias(alias) => (Some(*alias), 2),
        [alias, ..] if is_alias(alias) => (Some(*alias), 1),
        _ => (None, 0),
    }
}

fn is_alias(token: &str) -> bool {
    IDENTIFIER.is_match(token) && !CLAUSE_KEYWORDS.iter().any(|k| token.eq_ignore_ascii_case(k))
}
