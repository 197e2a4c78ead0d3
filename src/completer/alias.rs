//! Table aliases
//!
//! An alias is the capital letters of the unqualified table name
//! (`dbo.CustomerOrder` → `CO`), or the whole unqualified name when it has
//! none. Collisions within one statement get a running number: `CO`,
//! `CO1`, `CO2`, ...
//!
//! Aliases are assigned explicitly and exactly once per `Table`; reading
//! an unassigned alias gives `None`.

use serde::Serialize;

/// A table referenced by name, with its statement-scoped alias
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    /// Qualified (or as-typed) table name; the table's identity
    pub name: String,
    alias: Option<String>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
        }
    }

    /// A table whose alias was written by the user in the statement
    pub fn with_alias(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: Some(alias.into()),
        }
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }
}

fn unqualified(name: &str) -> &str {
    name.rsplit_once('.').map_or(name, |(_, table)| table)
}

/// Alias candidate before collision handling
pub fn derive_alias(name: &str) -> String {
    let table = unqualified(name);
    let capitals: String = table.chars().filter(|c| c.is_uppercase()).collect();
    if capitals.is_empty() {
        table.to_string()
    } else {
        capitals
    }
}

/// Whether `alias` is `candidate` or a numbered form of it (`candidate`
/// followed only by digits), ignoring case
fn in_family(alias: &str, candidate: &str) -> bool {
    let alias = alias.to_lowercase();
    alias
        .strip_prefix(&candidate.to_lowercase())
        .is_some_and(|rest| rest.chars().all(|c| c.is_ascii_digit()))
}

fn is_taken(taken: &[&str], alias: &str) -> bool {
    let alias = alias.to_lowercase();
    taken.iter().any(|t| t.to_lowercase() == alias)
}

/// Assign `table` an alias that does not clash with `already_used`.
///
/// A table that already has an alias keeps it. Assignment depends on the
/// order of `already_used`, so callers assign in document order.
pub fn assign_alias(table: &mut Table, already_used: &[Table]) -> String {
    if let Some(alias) = &table.alias {
        return alias.clone();
    }

    let candidate = derive_alias(&table.name);
    let taken: Vec<&str> = already_used.iter().filter_map(Table::alias).collect();

    let mut count = taken.iter().filter(|a| in_family(a, &candidate)).count();
    let mut alias = numbered(&candidate, count);
    while is_taken(&taken, &alias) {
        count += 1;
        alias = numbered(&candidate, count);
    }

    table.alias = Some(alias.clone());
    alias
}

fn numbered(candidate: &str, count: usize) -> String {
    if count == 0 {
        candidate.to_string()
    } else {
        format!("{}{}", candidate, count)
    }
}

/// Accumulates tables as they are aliased, so each new table is checked
/// against every table assigned before it.
#[derive(Debug, Clone, Default)]
pub struct AliasScope {
    tables: Vec<Table>,
}

impl AliasScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Alias every table in order and collect them into a scope
    pub fn from_tables(tables: impl IntoIterator<Item = Table>) -> Self {
        let mut scope = Self::new();
        for table in tables {
            scope.push(table);
        }
        scope
    }

    /// Assign `table` an alias against the scope, then add it to the scope
    pub fn push(&mut self, mut table: Table) -> String {
        let alias = assign_alias(&mut table, &self.tables);
        self.tables.push(table);
        alias
    }

    /// Alias `name` would get here, without adding it to the scope
    pub fn alias_for(&self, name: &str) -> String {
        assign_alias(&mut Table::new(name), &self.tables)
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitals_of_unqualified_name() {
        let mut table = Table::new("dbo.CustomerOrder");
        assert_eq!(assign_alias(&mut table, &[]), "CO");
        assert_eq!(table.alias(), Some("CO"));
    }

    #[test]
    fn test_no_capitals_uses_whole_name() {
        let mut table = Table::new("dbo.customer");
        assert_eq!(assign_alias(&mut table, &[]), "customer");
    }

    #[test]
    fn test_unqualified_name() {
        assert_eq!(derive_alias("OrderLine"), "OL");
        assert_eq!(derive_alias("db.sales.OrderLine"), "OL");
        assert_eq!(derive_alias("db.sales.x"), "x");
    }

    #[test]
    fn test_unassigned_alias_is_none() {
        assert_eq!(Table::new("dbo.Customer").alias(), None);
    }

    #[test]
    fn test_collision_appends_count() {
        let mut scope = AliasScope::new();
        assert_eq!(scope.push(Table::new("dbo.CustomerOrder")), "CO");
        assert_eq!(scope.push(Table::new("sales.CategoryOverride")), "CO1");
    }

    #[test]
    fn test_repeated_collisions_keep_counting() {
        let mut scope = AliasScope::new();
        let aliases: Vec<String> = ["a.AlphaBeta", "b.AppleBanana", "c.AnyBody", "d.AlphaBeta"]
            .into_iter()
            .map(|n| scope.push(Table::new(n)))
            .collect();
        assert_eq!(aliases, vec!["AB", "AB1", "AB2", "AB3"]);
    }

    #[test]
    fn test_assignment_is_cached() {
        let mut table = Table::new("dbo.CustomerOrder");
        let used = vec![Table::with_alias("x.Other", "CO")];
        assert_eq!(assign_alias(&mut table, &used), "CO1");
        // A second call ignores the (now different) context
        assert_eq!(assign_alias(&mut table, &[]), "CO1");
    }

    #[test]
    fn test_deterministic_for_fixed_context() {
        let used = vec![Table::with_alias("dbo.Customer", "C")];
        let first = assign_alias(&mut Table::new("dbo.Country"), &used);
        let second = assign_alias(&mut Table::new("dbo.Country"), &used);
        assert_eq!(first, "C1");
        assert_eq!(first, second);
    }

    #[test]
    fn test_explicit_alias_kept() {
        let mut scope = AliasScope::new();
        assert_eq!(scope.push(Table::with_alias("dbo.Customer", "c")), "c");
        assert_eq!(scope.tables()[0].alias(), Some("c"));
    }

    #[test]
    fn test_explicit_numbered_alias_is_skipped() {
        let used = vec![
            Table::with_alias("dbo.Customer", "C"),
            Table::with_alias("dbo.Campaign", "C2"),
        ];
        // C and C2 are both taken; count starts at 2 and moves past C2
        assert_eq!(assign_alias(&mut Table::new("dbo.Country"), &used), "C3");
    }

    #[test]
    fn test_collision_ignores_case() {
        let used = vec![Table::with_alias("public.Customer", "c")];
        assert_eq!(assign_alias(&mut Table::new("public.Category"), &used), "C1");
    }

    #[test]
    fn test_numbered_family_ignores_case() {
        let used = vec![
            Table::with_alias("dbo.Customer", "co"),
            Table::with_alias("dbo.Campaign", "co1"),
        ];
        assert_eq!(assign_alias(&mut Table::new("dbo.CustomerOrder"), &used), "CO2");
    }

    #[test]
    fn test_unassigned_tables_do_not_collide() {
        let used = vec![Table::new("dbo.CustomerOrder")];
        assert_eq!(assign_alias(&mut Table::new("dbo.CustomerOrder"), &used), "CO");
    }

    #[test]
    fn test_alias_for_does_not_grow_scope() {
        let scope = AliasScope::from_tables([Table::new("dbo.Customer")]);
        assert_eq!(scope.alias_for("dbo.Category"), "C1");
        assert_eq!(scope.alias_for("dbo.Category"), "C1");
        assert_eq!(scope.tables().len(), 1);
    }
}
